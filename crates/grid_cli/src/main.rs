use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grid_render::{
    write_image, ColorMap, FillMode, GridRenderer, Palette, PresetRegistry, RenderOptions,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render character grids to raster images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a grid text file to an image
    Render(RenderArgs),
    /// List the built-in palette presets and their digit colors
    Presets,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input text file containing the character grid
    input: PathBuf,
    /// Output image path; the format follows the extension
    #[arg(short, long, default_value = "grid.png")]
    output: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Built-in palette to color digits with
    #[arg(long)]
    preset: Option<String>,
    /// Explicit character color, as CHAR=RRGGBB; repeatable
    #[arg(long = "map", value_name = "CHAR=RRGGBB")]
    map: Vec<String>,
    /// Background color as RRGGBB hex
    #[arg(long, value_name = "RRGGBB", default_value = "ffffff")]
    bg: String,
    /// Pixel edge length of each square cell
    #[arg(long, default_value_t = 32)]
    cell_size: u32,
    /// What carries the cell color: the glyph, the background, or both
    #[arg(long, value_enum, default_value = "chars")]
    fill: FillChoice,
    /// Font file to draw glyphs with; falls back to a built-in font
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,
    /// Glyph pixel size; defaults to the cell size
    #[arg(long)]
    font_size: Option<u32>,
    /// Fail on unknown preset names instead of rendering black
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FillChoice {
    Chars,
    Background,
    Both,
}

impl FillChoice {
    fn to_mode(self) -> FillMode {
        match self {
            FillChoice::Chars => FillMode::Chars,
            FillChoice::Background => FillMode::Background,
            FillChoice::Both => FillMode::Both,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Presets => presets(),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let options = args.settings.to_options()?;
    let renderer = GridRenderer::default();

    let output = renderer
        .render_path(&args.input, &options)
        .with_context(|| format!("failed to render {:?}", args.input))?;
    write_image(&output.image, &args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;

    println!("Saved image to {}", args.output.display());
    Ok(())
}

fn presets() -> Result<()> {
    let registry = PresetRegistry::builtin();
    for &palette in Palette::ALL {
        let Some(map) = registry.get(palette.name()) else {
            continue;
        };
        let swatches: Vec<String> = ('0'..='9')
            .filter_map(|digit| map.get(digit))
            .map(|[r, g, b]| format!("#{r:02x}{g:02x}{b:02x}"))
            .collect();
        println!("{:<10} {}", palette.name(), swatches.join(" "));
    }
    Ok(())
}

impl RenderSettings {
    fn to_options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::default();
        options.preset = self.preset.clone();
        options.bg_color = parse_hex_color(&self.bg)
            .with_context(|| format!("invalid background color '{}'", self.bg))?;
        options.cell_size = self.cell_size;
        options.fill = self.fill.to_mode();
        options.font_path = self.font.clone();
        options.font_size = self.font_size;
        options.strict_presets = self.strict;

        if !self.map.is_empty() {
            let mut map = ColorMap::new();
            for entry in &self.map {
                let (ch, color) = parse_map_entry(entry)
                    .with_context(|| format!("invalid map entry '{entry}'"))?;
                map.insert(ch, color);
            }
            options.color_map = Some(map);
        }

        Ok(options)
    }
}

/// Parse one `--map` entry of the form `CHAR=RRGGBB`.
fn parse_map_entry(entry: &str) -> Result<(char, [u8; 3])> {
    let Some((key, value)) = entry.split_once('=') else {
        bail!("expected CHAR=RRGGBB");
    };
    let mut chars = key.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        bail!("key must be a single character");
    };
    Ok((ch, parse_hex_color(value)?))
}

fn parse_hex_color(value: &str) -> Result<[u8; 3]> {
    let value = value.strip_prefix('#').unwrap_or(value);
    if value.len() != 6 || !value.is_ascii() {
        bail!("expected six hex digits");
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&value[range], 16).context("expected six hex digits")
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_and_without_hash() {
        assert_eq!(parse_hex_color("ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(parse_hex_color("#0000ff").unwrap(), [0, 0, 255]);
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }

    #[test]
    fn map_entries_parse_single_characters() {
        assert_eq!(parse_map_entry("0=ff0000").unwrap(), ('0', [255, 0, 0]));
        assert_eq!(parse_map_entry("#=00ff00").unwrap(), ('#', [0, 255, 0]));
        assert!(parse_map_entry("ab=ff0000").is_err());
        assert!(parse_map_entry("ff0000").is_err());
    }
}
