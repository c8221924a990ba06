//! Picks a small set of frequent, mutually distinct colors out of an RGBA pixel buffer.
//!
//! The work happens in three stages: [`sample`] counts colors, [`rank`] orders them by
//! frequency and [`deduplicate`] drops colors too close to a more frequent one.

pub mod color;
pub mod config;
pub mod dedup;
pub mod error;
pub mod ranker;
pub mod sampler;

use log::debug;

pub use crate::color::ColorKey;
pub use crate::config::ExtractionConfig;
pub use crate::dedup::{deduplicate, Palette};
pub use crate::error::{PrismError, Result};
pub use crate::ranker::rank;
pub use crate::sampler::{sample, sample_parallel, ColorCount, FrequencyTable};

/// Runs the full pipeline over a flat RGBA buffer with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct PaletteExtractor {
    config: ExtractionConfig,
}

impl PaletteExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract(&self, buffer: &[u8]) -> Result<Palette> {
        let config = &self.config;
        let table = if config.parallel {
            sample_parallel(buffer, config.stride, config.alpha_threshold)?
        } else {
            sample(buffer, config.stride, config.alpha_threshold)?
        };
        let ranked = rank(table);
        let palette = deduplicate(&ranked, config.similarity_threshold, config.max_colors);
        debug!(
            "kept {} of {} ranked colors",
            palette.len(),
            ranked.len()
        );
        Ok(palette)
    }

    pub fn extract_hex(&self, buffer: &[u8]) -> Result<Vec<String>> {
        Ok(self.extract(buffer)?.to_hex())
    }
}

pub fn extract(buffer: &[u8], config: &ExtractionConfig) -> Result<Palette> {
    PaletteExtractor::new(config.clone())?.extract(buffer)
}

pub fn extract_hex(buffer: &[u8], config: &ExtractionConfig) -> Result<Vec<String>> {
    Ok(extract(buffer, config)?.to_hex())
}
