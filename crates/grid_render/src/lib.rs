mod grid;
mod paint;

use std::path::Path;

use image::RgbImage;
use log::info;

pub use grid::{layout::RasterGeometry, parse::CharGrid};
pub use paint::{
    font::CellFont,
    mapping::{ColorMap, PresetRegistry, DEFAULT_COLOR},
    palette::Palette,
    raster::FillMode,
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("empty input: the grid has no rows")]
    EmptyGrid,
    #[error("ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("unsupported raster geometry")]
    InvalidGeometry,
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-call rendering options.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Explicit character-to-color table; ignored when `preset` is set.
    pub color_map: Option<ColorMap>,
    /// Name of a palette in the renderer's preset registry.
    pub preset: Option<String>,
    /// Canvas background, also the cell background in `Chars` mode.
    pub bg_color: [u8; 3],
    /// Pixel edge length of each square cell.
    pub cell_size: u32,
    pub fill: FillMode,
    /// Font file to load; `None` probes the default bold monospace faces.
    pub font_path: Option<std::path::PathBuf>,
    /// Glyph pixel size; defaults to `cell_size`.
    pub font_size: Option<u32>,
    /// Fail on unknown preset names instead of degrading to an empty map.
    pub strict_presets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color_map: None,
            preset: None,
            bg_color: [255, 255, 255],
            cell_size: 32,
            fill: FillMode::default(),
            font_path: None,
            font_size: None,
            strict_presets: false,
        }
    }
}

#[derive(Debug)]
pub struct RenderOutput {
    pub image: RgbImage,
    pub geometry: RasterGeometry,
}

/// Renders character grids into raster images.
///
/// Holds the preset registry so embedders construct it once and share it
/// across calls; rendering itself takes `&self` only.
#[derive(Debug)]
pub struct GridRenderer {
    presets: PresetRegistry,
}

impl GridRenderer {
    pub fn new(presets: PresetRegistry) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Validate `text` and rasterize it per `options`.
    pub fn render_text(
        &self,
        text: &str,
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderError> {
        let grid = CharGrid::parse(text)?;

        let geometry = RasterGeometry::derive(grid.width(), grid.height(), options.cell_size)
            .ok_or(RenderError::InvalidGeometry)?;

        let color_map = paint::mapping::resolve_color_map(
            &self.presets,
            options.preset.as_deref(),
            options.color_map.as_ref(),
            options.strict_presets,
        )?;

        let font_size = options.font_size.unwrap_or(options.cell_size);
        let font = CellFont::resolve(options.font_path.as_deref(), font_size);

        let image =
            paint::raster::render(&grid, &color_map, &font, geometry, options.bg_color, options.fill);

        Ok(RenderOutput { image, geometry })
    }

    /// Read a grid from a text file and render it.
    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderError> {
        let text = std::fs::read_to_string(path)?;
        self.render_text(&text, options)
    }

    /// Render `text` and persist the result to `out_path`.
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        text: &str,
        options: &RenderOptions,
        out_path: P,
    ) -> Result<RenderOutput, RenderError> {
        let output = self.render_text(text, options)?;
        write_image(&output.image, out_path)?;
        Ok(output)
    }
}

impl Default for GridRenderer {
    /// A renderer backed by the built-in palette registry.
    fn default() -> Self {
        Self::new(PresetRegistry::builtin())
    }
}

/// Persist `image` to `path`; the raster format is inferred from the
/// extension. Filesystem and encoding failures propagate unchanged.
pub fn write_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    image.save(path)?;
    info!("saved image to {}", path.display());
    Ok(())
}
