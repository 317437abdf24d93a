//! Built-in color palettes and the multi-stop interpolation engine behind
//! them.
//!
//! Each palette approximates a well-known scientific colormap with a handful
//! of anchor stops; [`Palette::sample`] interpolates linearly between them.

/// A color stop: position in [0, 1] mapped to an RGB triple.
#[derive(Clone, Copy, Debug)]
struct ColorStop {
    t: f64,
    color: [u8; 3],
}

impl ColorStop {
    const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self { t, color: [r, g, b] }
    }
}

/// Built-in continuous colormaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Palette {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Terrain,
    Coolwarm,
}

impl Palette {
    /// All built-in palettes, in registry order.
    pub const ALL: &'static [Palette] = &[
        Self::Viridis,
        Self::Plasma,
        Self::Inferno,
        Self::Magma,
        Self::Cividis,
        Self::Terrain,
        Self::Coolwarm,
    ];

    /// Lower-case registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Plasma => "plasma",
            Self::Inferno => "inferno",
            Self::Magma => "magma",
            Self::Cividis => "cividis",
            Self::Terrain => "terrain",
            Self::Coolwarm => "coolwarm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|palette| palette.name() == name)
    }

    fn stops(&self) -> &'static [ColorStop] {
        match self {
            Self::Viridis => VIRIDIS_STOPS,
            Self::Plasma => PLASMA_STOPS,
            Self::Inferno => INFERNO_STOPS,
            Self::Magma => MAGMA_STOPS,
            Self::Cividis => CIVIDIS_STOPS,
            Self::Terrain => TERRAIN_STOPS,
            Self::Coolwarm => COOLWARM_STOPS,
        }
    }

    /// Evaluate the palette at normalized position `t`, clamped to [0, 1].
    pub fn sample(&self, t: f64) -> [u8; 3] {
        multi_stop(self.stops(), t)
    }

    /// The ten representative colors used for digit presets, sampled at
    /// `i / 9` for `i` in `0..10`.
    pub fn digit_colors(&self) -> [[u8; 3]; 10] {
        let mut colors = [[0u8; 3]; 10];
        for (index, slot) in colors.iter_mut().enumerate() {
            *slot = self.sample(index as f64 / 9.0);
        }
        colors
    }
}

const VIRIDIS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 68, 1, 84),
    ColorStop::new(0.25, 59, 82, 139),
    ColorStop::new(0.50, 33, 145, 140),
    ColorStop::new(0.75, 94, 201, 98),
    ColorStop::new(1.00, 253, 231, 37),
];

const PLASMA_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 13, 8, 135),
    ColorStop::new(0.25, 126, 3, 168),
    ColorStop::new(0.50, 204, 71, 120),
    ColorStop::new(0.75, 248, 149, 64),
    ColorStop::new(1.00, 240, 249, 33),
];

const INFERNO_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 0, 0, 4),
    ColorStop::new(0.25, 87, 16, 110),
    ColorStop::new(0.50, 188, 55, 84),
    ColorStop::new(0.75, 249, 142, 9),
    ColorStop::new(1.00, 252, 255, 164),
];

const MAGMA_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 0, 0, 4),
    ColorStop::new(0.25, 81, 18, 124),
    ColorStop::new(0.50, 183, 55, 121),
    ColorStop::new(0.75, 252, 137, 97),
    ColorStop::new(1.00, 252, 253, 191),
];

const CIVIDIS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 0, 32, 76),
    ColorStop::new(0.25, 64, 89, 107),
    ColorStop::new(0.50, 124, 123, 120),
    ColorStop::new(0.75, 192, 167, 94),
    ColorStop::new(1.00, 255, 234, 70),
];

const TERRAIN_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 51, 51, 153),
    ColorStop::new(0.15, 0, 153, 255),
    ColorStop::new(0.25, 0, 204, 102),
    ColorStop::new(0.50, 255, 255, 153),
    ColorStop::new(0.75, 128, 92, 84),
    ColorStop::new(1.00, 255, 255, 255),
];

const COOLWARM_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 59, 76, 192),
    ColorStop::new(0.25, 124, 159, 249),
    ColorStop::new(0.50, 221, 221, 221),
    ColorStop::new(0.75, 245, 156, 125),
    ColorStop::new(1.00, 180, 4, 38),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: [u8; 3], c2: [u8; 3], t: f64) -> [u8; 3] {
    [
        lerp(c1[0] as f64, c2[0] as f64, t).round() as u8,
        lerp(c1[1] as f64, c2[1] as f64, t).round() as u8,
        lerp(c1[2] as f64, c2[2] as f64, t).round() as u8,
    ]
}

fn multi_stop(stops: &[ColorStop], t: f64) -> [u8; 3] {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(Palette::Viridis.sample(0.0), [68, 1, 84]);
        assert_eq!(Palette::Viridis.sample(1.0), [253, 231, 37]);
    }

    #[test]
    fn samples_clamp_outside_unit_range() {
        assert_eq!(Palette::Plasma.sample(-0.5), Palette::Plasma.sample(0.0));
        assert_eq!(Palette::Plasma.sample(1.5), Palette::Plasma.sample(1.0));
    }

    #[test]
    fn digit_colors_are_distinct_for_every_palette() {
        for &palette in Palette::ALL {
            let colors = palette.digit_colors();
            for i in 0..colors.len() {
                for j in i + 1..colors.len() {
                    assert_ne!(
                        colors[i], colors[j],
                        "{} digits {i} and {j} collide",
                        palette.name()
                    );
                }
            }
        }
    }

    #[test]
    fn digit_colors_match_direct_sampling() {
        let colors = Palette::Terrain.digit_colors();
        assert_eq!(colors[0], Palette::Terrain.sample(0.0));
        assert_eq!(colors[9], Palette::Terrain.sample(1.0));
        assert_eq!(colors[3], Palette::Terrain.sample(3.0 / 9.0));
    }

    #[test]
    fn names_round_trip() {
        for &palette in Palette::ALL {
            assert_eq!(Palette::from_name(palette.name()), Some(palette));
        }
        assert_eq!(Palette::from_name("jet"), None);
    }
}
