use image::{Rgb, RgbImage};

use super::font::CellFont;
use super::mapping::ColorMap;
use crate::grid::layout::RasterGeometry;
use crate::grid::parse::CharGrid;

/// Which part of a cell carries the resolved character color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Cell background stays the page color; the glyph is drawn in the
    /// character color.
    #[default]
    Chars,
    /// Cell background takes the character color; the glyph is drawn in the
    /// page color (knockout).
    Background,
    /// Cell background takes the character color; no glyph is drawn.
    Both,
}

/// Walk the grid cell by cell and paint the canvas.
///
/// The canvas starts out filled with `bg_color`; each cell then gets a flat
/// fill and, depending on `fill`, a glyph centered on the cell's measured
/// ink box.
pub fn render(
    grid: &CharGrid,
    color_map: &ColorMap,
    font: &CellFont,
    geometry: RasterGeometry,
    bg_color: [u8; 3],
    fill: FillMode,
) -> RgbImage {
    let cell = geometry.cell_size;
    let mut image =
        RgbImage::from_pixel(geometry.pixel_width(), geometry.pixel_height(), Rgb(bg_color));

    for (y, row) in grid.rows().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            let color = color_map.color_for(ch);
            let x0 = x as u32 * cell;
            let y0 = y as u32 * cell;

            match fill {
                FillMode::Both => {
                    fill_cell(&mut image, x0, y0, cell, color);
                },
                FillMode::Background => {
                    fill_cell(&mut image, x0, y0, cell, color);
                    draw_glyph(&mut image, font, ch, x0, y0, cell, bg_color);
                },
                FillMode::Chars => {
                    fill_cell(&mut image, x0, y0, cell, bg_color);
                    draw_glyph(&mut image, font, ch, x0, y0, cell, color);
                },
            }
        }
    }

    image
}

fn fill_cell(image: &mut RgbImage, x0: u32, y0: u32, cell: u32, color: [u8; 3]) {
    for y in y0..y0 + cell {
        for x in x0..x0 + cell {
            image.put_pixel(x, y, Rgb(color));
        }
    }
}

/// Draw `ch` centered in the cell at `(x0, y0)`.
///
/// Centering offsets use floor division of `(cell - extent) / 2` on signed
/// values, so glyphs larger than the cell overhang symmetrically; pixels are
/// clipped to the image, not the cell.
fn draw_glyph(
    image: &mut RgbImage,
    font: &CellFont,
    ch: char,
    x0: u32,
    y0: u32,
    cell: u32,
    color: [u8; 3],
) {
    let Some(glyph) = font.glyph(ch) else {
        return;
    };

    let origin_x = i64::from(x0) + (i64::from(cell) - i64::from(glyph.width)).div_euclid(2);
    let origin_y = i64::from(y0) + (i64::from(cell) - i64::from(glyph.height)).div_euclid(2);
    let (image_width, image_height) = image.dimensions();

    glyph.for_each(|gx, gy, coverage| {
        let px = origin_x + i64::from(gx);
        let py = origin_y + i64::from(gy);
        if px < 0 || py < 0 || px >= i64::from(image_width) || py >= i64::from(image_height) {
            return;
        }
        let pixel = image.get_pixel_mut(px as u32, py as u32);
        *pixel = blend(*pixel, color, coverage);
    });
}

fn blend(under: Rgb<u8>, over: [u8; 3], coverage: f32) -> Rgb<u8> {
    let mix = |u: u8, o: u8| (f32::from(o) * coverage + f32::from(u) * (1.0 - coverage)) as u8;
    Rgb([
        mix(under.0[0], over[0]),
        mix(under.0[1], over[1]),
        mix(under.0[2], over[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::mapping;

    const RED: [u8; 3] = [255, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];

    fn fixture(text: &str, cell: u32) -> (CharGrid, RasterGeometry, CellFont) {
        let grid = CharGrid::parse(text).unwrap();
        let geometry = RasterGeometry::derive(grid.width(), grid.height(), cell).unwrap();
        let font = CellFont::builtin(cell);
        (grid, geometry, font)
    }

    fn color_counts(image: &RgbImage, color: [u8; 3]) -> usize {
        image.pixels().filter(|pixel| pixel.0 == color).count()
    }

    #[test]
    fn output_dimensions_match_grid_and_cell_size() {
        let (grid, geometry, font) = fixture("#####\n#####\n#####", 7);
        let map = ColorMap::new();
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Both);
        assert_eq!(image.dimensions(), (35, 21));
    }

    #[test]
    fn both_mode_produces_flat_cells() {
        let (grid, geometry, font) = fixture("##\n##", 8);
        let map = ColorMap::from_entries([('#', RED)]);
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Both);
        assert_eq!(color_counts(&image, RED), (image.width() * image.height()) as usize);
    }

    #[test]
    fn chars_mode_draws_colored_ink_on_page_background() {
        let (grid, geometry, font) = fixture("##\n##", 8);
        let map = ColorMap::from_entries([('#', RED)]);
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Chars);

        let red = color_counts(&image, RED);
        let white = color_counts(&image, WHITE);
        assert!(red > 0, "glyph ink missing");
        assert!(white > 0, "page background missing");
        // Builtin coverage is binary, so every pixel is one of the two roles.
        assert_eq!(red + white, (image.width() * image.height()) as usize);
    }

    #[test]
    fn background_mode_is_the_exact_color_inversion_of_chars_mode() {
        let (grid, geometry, font) = fixture("##\n##", 8);
        let map = ColorMap::from_entries([('#', RED)]);
        let chars = render(&grid, &map, &font, geometry, WHITE, FillMode::Chars);
        let knockout = render(&grid, &map, &font, geometry, WHITE, FillMode::Background);

        for (chars_pixel, knockout_pixel) in chars.pixels().zip(knockout.pixels()) {
            let expected = if chars_pixel.0 == RED { WHITE } else { RED };
            assert_eq!(knockout_pixel.0, expected);
        }
    }

    #[test]
    fn unmapped_characters_render_black() {
        let (grid, geometry, font) = fixture("zz", 4);
        let map = ColorMap::new();
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Both);
        assert_eq!(
            color_counts(&image, mapping::DEFAULT_COLOR),
            (image.width() * image.height()) as usize
        );
    }

    #[test]
    fn spaces_draw_no_ink() {
        let (grid, geometry, font) = fixture("  \n  ", 8);
        let map = ColorMap::from_entries([(' ', RED)]);
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Chars);
        assert_eq!(color_counts(&image, WHITE), (image.width() * image.height()) as usize);
    }

    #[test]
    fn glyph_ink_is_centered_in_the_cell() {
        let (grid, geometry, font) = fixture("#", 16);
        let map = ColorMap::from_entries([('#', RED)]);
        let image = render(&grid, &map, &font, geometry, WHITE, FillMode::Chars);

        let glyph = font.glyph('#').unwrap();
        let expected_x = (16 - glyph.width as i64).div_euclid(2);
        let expected_y = (16 - glyph.height as i64).div_euclid(2);

        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0 == RED {
                min_x = min_x.min(i64::from(x));
                min_y = min_y.min(i64::from(y));
            }
        }
        assert_eq!(min_x, expected_x);
        assert_eq!(min_y, expected_y);
    }
}
