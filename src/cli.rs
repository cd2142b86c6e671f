use crate::config::load_config;
use crate::ingest::read_rows;
use crate::layout::{SystemTextMeasure, compute_layout};
use crate::render::{render_svg, write_output_svg};
use crate::theme::Theme;
use crate::tree::Forest;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "sitetree",
    version,
    about = "Render a spreadsheet hierarchy table as a tree diagram"
)]
pub struct Args {
    /// Input table (.csv or .tsv), one row per path, one column per level
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Font size in points
    #[arg(long = "font-size")]
    pub font_size: Option<f32>,

    /// Device pixels per layout inch
    #[arg(long = "dpi")]
    pub dpi: Option<f32>,

    /// Open the rendered document with the platform viewer
    #[arg(long = "show")]
    pub show: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(size) = args.font_size {
        config.theme.font_size = size;
    }
    if let Some(dpi) = args.dpi {
        config.layout.dpi = dpi;
    }
    if args.show {
        config.render.show = true;
    }

    // Ingestion failures are fatal and surface before any layout work.
    let rows = read_rows(&args.input)?;
    let forest = Forest::from_rows(rows);

    let backend = SystemTextMeasure::new(&config.theme);
    let layout = compute_layout(&forest, &backend, &config.theme, &config.layout);
    let svg = render_svg(&forest, &layout, &config.theme, &config.layout, &config.render);

    let written = match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
            args.output.clone()
        }
        OutputFormat::Png => {
            let output = args
                .output
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_png(&svg, &output, &config.theme)?;
            Some(output)
        }
    };

    if config.render.show
        && let Some(path) = written
    {
        crate::render::show_document(&path);
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    crate::render::write_output_png(svg, output, theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}
