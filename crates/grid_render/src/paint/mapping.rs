use std::collections::HashMap;

use log::warn;

use super::palette::Palette;
use crate::RenderError;

/// Default color for characters without a mapping entry.
pub const DEFAULT_COLOR: [u8; 3] = [0, 0, 0];

/// A character-to-color table, immutable once resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorMap {
    entries: HashMap<char, [u8; 3]>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (char, [u8; 3])>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    pub fn insert(&mut self, ch: char, color: [u8; 3]) {
        self.entries.insert(ch, color);
    }

    /// The color for `ch`, falling back to [`DEFAULT_COLOR`] when unmapped.
    pub fn color_for(&self, ch: char) -> [u8; 3] {
        self.entries.get(&ch).copied().unwrap_or(DEFAULT_COLOR)
    }

    pub fn get(&self, ch: char) -> Option<[u8; 3]> {
        self.entries.get(&ch).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named palette registry, constructed once and passed by reference into
/// render calls. Read-only after construction, so shared use across threads
/// needs no locking.
#[derive(Clone, Debug, Default)]
pub struct PresetRegistry {
    presets: HashMap<String, ColorMap>,
}

impl PresetRegistry {
    /// Registry with no presets; useful for tests and embedders that supply
    /// their own tables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every built-in palette as a digit table: `'0'..='9'`
    /// mapped to the palette sampled at ten evenly spaced points.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for &palette in Palette::ALL {
            registry.insert(palette.name(), digit_map(palette));
        }
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, map: ColorMap) {
        self.presets.insert(name.into(), map);
    }

    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.presets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

fn digit_map(palette: Palette) -> ColorMap {
    let colors = palette.digit_colors();
    let mut map = ColorMap::new();
    for (digit, color) in colors.into_iter().enumerate() {
        // `digit` is 0..10 by construction.
        let ch = char::from_digit(digit as u32, 10).unwrap_or('0');
        map.insert(ch, color);
    }
    map
}

/// Produce the effective color mapping for one render call.
///
/// Precedence: named preset, else the explicit map, else an empty map (every
/// character falls back to [`DEFAULT_COLOR`]). An unknown preset name
/// degrades to an empty map with a warning unless `strict` is set, in which
/// case it is an error.
pub fn resolve_color_map(
    registry: &PresetRegistry,
    preset: Option<&str>,
    explicit: Option<&ColorMap>,
    strict: bool,
) -> Result<ColorMap, RenderError> {
    if let Some(name) = preset {
        return match registry.get(name) {
            Some(map) => Ok(map.clone()),
            None if strict => Err(RenderError::UnknownPreset(name.to_string())),
            None => {
                warn!("unknown preset '{name}', rendering with an empty color map");
                Ok(ColorMap::new())
            },
        };
    }

    Ok(explicit.cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_characters_default_to_black() {
        let map = ColorMap::new();
        assert_eq!(map.color_for('x'), DEFAULT_COLOR);
    }

    #[test]
    fn builtin_registry_has_all_palettes() {
        let registry = PresetRegistry::builtin();
        assert_eq!(registry.len(), Palette::ALL.len());
        for &palette in Palette::ALL {
            assert!(registry.get(palette.name()).is_some());
        }
    }

    #[test]
    fn presets_map_exactly_the_ten_digits() {
        let registry = PresetRegistry::builtin();
        for &palette in Palette::ALL {
            let map = registry.get(palette.name()).unwrap();
            assert_eq!(map.len(), 10);
            for digit in '0'..='9' {
                assert!(map.get(digit).is_some());
            }
            assert_eq!(map.get('a'), None);
        }
    }

    #[test]
    fn preset_digits_match_palette_samples() {
        let registry = PresetRegistry::builtin();
        let map = registry.get("viridis").unwrap();
        let colors = Palette::Viridis.digit_colors();
        assert_eq!(map.get('0'), Some(colors[0]));
        assert_eq!(map.get('9'), Some(colors[9]));
    }

    #[test]
    fn preset_takes_precedence_over_explicit_map() {
        let registry = PresetRegistry::builtin();
        let explicit = ColorMap::from_entries([('0', [1, 2, 3])]);
        let resolved =
            resolve_color_map(&registry, Some("viridis"), Some(&explicit), false).unwrap();
        assert_eq!(resolved.get('0'), Some(Palette::Viridis.sample(0.0)));
    }

    #[test]
    fn explicit_map_is_used_verbatim() {
        let registry = PresetRegistry::builtin();
        let explicit = ColorMap::from_entries([('#', [255, 0, 0])]);
        let resolved = resolve_color_map(&registry, None, Some(&explicit), false).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn unknown_preset_degrades_to_empty_map() {
        let registry = PresetRegistry::builtin();
        let resolved = resolve_color_map(&registry, Some("jet"), None, false).unwrap();
        assert!(resolved.is_empty());
        assert_eq!(resolved.color_for('0'), DEFAULT_COLOR);
    }

    #[test]
    fn unknown_preset_fails_in_strict_mode() {
        let registry = PresetRegistry::builtin();
        let err = resolve_color_map(&registry, Some("jet"), None, true).unwrap_err();
        assert!(matches!(err, RenderError::UnknownPreset(name) if name == "jet"));
    }

    #[test]
    fn custom_registries_are_honored() {
        let mut registry = PresetRegistry::empty();
        registry.insert("flag", ColorMap::from_entries([('x', [9, 9, 9])]));
        let resolved = resolve_color_map(&registry, Some("flag"), None, true).unwrap();
        assert_eq!(resolved.get('x'), Some([9, 9, 9]));
    }
}
