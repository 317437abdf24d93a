use std::io;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS};
use log::warn;

/// Probed when no explicit font path is configured. A bold monospace face is
/// preferred to keep glyphs legible at small cell sizes.
const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "consolab.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
    "/usr/share/fonts/gnu-free/FreeMonoBold.otf",
];

enum FontSource {
    /// A loaded outline font rendered through `ab_glyph`.
    Outline(FontVec),
    /// The embedded 8x8 bitmap font, scaled to the configured size.
    Bitmap,
}

/// The font handle used to draw cell glyphs, resolved once per render call.
pub struct CellFont {
    source: FontSource,
    size: u32,
}

/// A rasterized glyph: per-pixel coverage over its tight ink box.
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl RasterGlyph {
    fn new(width: u32, height: u32, coverage: Vec<f32>) -> Option<Self> {
        debug_assert_eq!(coverage.len(), (width * height) as usize);
        if width == 0 || height == 0 || coverage.iter().all(|c| *c <= 0.0) {
            return None;
        }
        Some(Self { width, height, coverage })
    }

    /// Visit every pixel with non-zero coverage, coordinates relative to the
    /// glyph's ink box.
    pub fn for_each(&self, mut paint: impl FnMut(u32, u32, f32)) {
        for y in 0..self.height {
            for x in 0..self.width {
                let value = self.coverage[(y * self.width + x) as usize];
                if value > 0.0 {
                    paint(x, y, value);
                }
            }
        }
    }
}

impl CellFont {
    /// Resolve the font for one render call. Never fails outward: a missing
    /// or unreadable face degrades to the built-in bitmap font with a
    /// warning.
    pub fn resolve(path: Option<&Path>, size: u32) -> Self {
        if let Some(path) = path {
            match Self::load_outline(path, size) {
                Ok(font) => return font,
                Err(err) => {
                    warn!(
                        "failed to load font {}: {err}; using the built-in bitmap font",
                        path.display()
                    );
                },
            }
        } else {
            for candidate in DEFAULT_FONT_CANDIDATES {
                if let Ok(font) = Self::load_outline(Path::new(candidate), size) {
                    return font;
                }
            }
            warn!("no default monospace font found; using the built-in bitmap font");
        }

        Self::builtin(size)
    }

    /// The embedded 8x8 bitmap font at the given pixel size.
    pub fn builtin(size: u32) -> Self {
        Self { source: FontSource::Bitmap, size }
    }

    fn load_outline(path: &Path, size: u32) -> io::Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "not a valid font file"))?;
        Ok(Self { source: FontSource::Outline(font), size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Bitmap)
    }

    /// Rasterize `ch` at the configured size. `None` when the font has no
    /// glyph for the character or the glyph has no ink (spaces).
    pub fn glyph(&self, ch: char) -> Option<RasterGlyph> {
        match &self.source {
            FontSource::Outline(font) => outline_glyph(font, ch, self.size),
            FontSource::Bitmap => bitmap_glyph(ch, self.size),
        }
    }
}

fn outline_glyph(font: &FontVec, ch: char, size: u32) -> Option<RasterGlyph> {
    let glyph_id = font.glyph_id(ch);
    // Glyph id 0 is .notdef; skip it rather than render placeholder boxes.
    if glyph_id.0 == 0 {
        return None;
    }

    let scale = PxScale::from(size as f32);
    let glyph = glyph_id.with_scale_and_position(scale, point(0.0, 0.0));
    let outline = font.outline_glyph(glyph)?;

    let bounds = outline.px_bounds();
    let width = bounds.width().ceil() as u32;
    let height = bounds.height().ceil() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let mut coverage = vec![0.0f32; (width * height) as usize];
    outline.draw(|x, y, value| {
        if x < width && y < height {
            coverage[(y * width + x) as usize] = value.clamp(0.0, 1.0);
        }
    });

    RasterGlyph::new(width, height, coverage)
}

fn bitmap_rows(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
}

fn bitmap_glyph(ch: char, size: u32) -> Option<RasterGlyph> {
    let rows = bitmap_rows(ch)?;
    if rows.iter().all(|row| *row == 0) {
        return None;
    }

    // Nearest-neighbor scale of the 8x8 bitmap onto a size x size square.
    let mut covered = vec![false; (size * size) as usize];
    for py in 0..size {
        let sy = (py * 8 / size) as usize;
        for px in 0..size {
            let sx = px * 8 / size;
            if rows[sy] & (1 << sx) != 0 {
                covered[(py * size + px) as usize] = true;
            }
        }
    }

    // Crop to the tight ink box so centering matches the outline path.
    let mut min_x = size;
    let mut min_y = size;
    let mut max_x = 0;
    let mut max_y = 0;
    for y in 0..size {
        for x in 0..size {
            if covered[(y * size + x) as usize] {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }
    if min_x > max_x {
        return None;
    }

    let width = max_x - min_x + 1;
    let height = max_y - min_y + 1;
    let mut coverage = vec![0.0f32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            if covered[((y + min_y) * size + x + min_x) as usize] {
                coverage[(y * width + x) as usize] = 1.0;
            }
        }
    }

    RasterGlyph::new(width, height, coverage)
}
