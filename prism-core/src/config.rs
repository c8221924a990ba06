use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PrismError, Result};

pub const DEFAULT_STRIDE: usize = 5;
pub const DEFAULT_ALPHA_THRESHOLD: u32 = 128;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 40.0;
pub const DEFAULT_MAX_COLORS: usize = 15;

/// Tuning knobs for one extraction. Missing fields in a JSON document take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample every `stride`-th pixel.
    pub stride: usize,
    /// Pixels with alpha below this are ignored. Must be in `0..=255`.
    pub alpha_threshold: u32,
    /// Minimum RGB distance between two palette entries.
    pub similarity_threshold: f64,
    pub max_colors: usize,
    /// Sample the buffer on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_colors: DEFAULT_MAX_COLORS,
            parallel: false,
        }
    }
}

/// Shared by [`ExtractionConfig::validate`] and the public sampling functions.
pub(crate) fn check_sampling(stride: usize, alpha_threshold: u32) -> Result<()> {
    if stride == 0 {
        return Err(PrismError::InvalidConfiguration(
            "stride must be at least 1".to_string(),
        ));
    }
    if alpha_threshold > 255 {
        return Err(PrismError::InvalidConfiguration(format!(
            "alpha_threshold must be in 0..=255, got {}",
            alpha_threshold
        )));
    }
    Ok(())
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        check_sampling(self.stride, self.alpha_threshold)?;
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(PrismError::InvalidConfiguration(format!(
                "similarity_threshold must be a non-negative number, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON document.
    ///
    /// Malformed JSON is a [`PrismError::Json`]; well-formed JSON holding a value outside a
    /// field's domain (a negative `stride`, a string `max_colors`, ...) is a
    /// [`PrismError::InvalidConfiguration`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                PrismError::InvalidConfiguration(e.to_string())
            } else {
                PrismError::Json(e)
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
