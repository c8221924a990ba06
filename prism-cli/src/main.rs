use anyhow::{bail, Context, Result};
use clap::Parser;
use prism_core::{ExtractionConfig, Palette};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Print the prominent colors of one or more images.
#[derive(Parser, Debug)]
#[command(name = "prism", author, version, about)]
struct Args {
    /// Image files to read
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with extraction settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample every Nth pixel
    #[arg(short, long)]
    stride: Option<usize>,

    /// Ignore pixels with alpha below this value (0-255)
    #[arg(short, long)]
    alpha: Option<u32>,

    /// Minimum RGB distance between two reported colors
    #[arg(long)]
    similarity: Option<f64>,

    /// Maximum number of colors per image
    #[arg(short = 'n', long)]
    max_colors: Option<usize>,

    /// Sample on all cores
    #[arg(short, long)]
    parallel: bool,

    /// Print one JSON object per image instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a Path,
    colors: &'a Palette,
}

impl Args {
    fn extraction_config(&self) -> Result<ExtractionConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExtractionConfig::default(),
        };
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(alpha) = self.alpha {
            config.alpha_threshold = alpha;
        }
        if let Some(similarity) = self.similarity {
            config.similarity_threshold = similarity;
        }
        if let Some(max_colors) = self.max_colors {
            config.max_colors = max_colors;
        }
        config.parallel |= self.parallel;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.extraction_config()?;
    log::debug!("using {:?}", config);

    run(&args, &config, &mut std::io::stdout().lock())
}

/// Reports every input to `out`. Inputs that fail are logged and skipped, and the run
/// as a whole fails if any did.
fn run(args: &Args, config: &ExtractionConfig, out: &mut impl Write) -> Result<()> {
    let mut failures = 0;
    for input in &args.inputs {
        let palette = match prism_image::extract_palette(input, config) {
            Ok(palette) => palette,
            Err(e) => {
                log::warn!("Skipping {}: {:#}", input.display(), e);
                failures += 1;
                continue;
            }
        };

        if args.json {
            let report = Report { path: input, colors: &palette };
            match serde_json::to_string(&report) {
                Ok(line) => writeln!(out, "{}", line)?,
                Err(e) => {
                    log::warn!("Skipping {}: {}", input.display(), e);
                    failures += 1;
                }
            }
        } else {
            write_palette(out, input, &palette)?;
        }
    }

    if failures > 0 {
        bail!("{} of {} images could not be processed", failures, args.inputs.len());
    }
    Ok(())
}

fn write_palette(out: &mut impl Write, path: &Path, palette: &Palette) -> io::Result<()> {
    writeln!(out, "{}:", path.display())?;
    if palette.is_empty() {
        return writeln!(out, "  No prominent colors found.");
    }
    for color in palette {
        writeln!(out, "  {}", color)?;
    }
    Ok(())
}
