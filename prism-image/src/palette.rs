use anyhow::{Context, Result};
use image::DynamicImage;
use log::debug;
use prism_core::{ExtractionConfig, Palette, PaletteExtractor};
use std::path::Path;

/// Decodes an image file into a flat RGBA8 buffer.
pub fn pixels_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(into_pixels(img))
}

/// Decodes encoded image bytes (PNG, JPEG, ...) into a flat RGBA8 buffer.
pub fn pixels_from_memory(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok(into_pixels(img))
}

fn into_pixels(img: DynamicImage) -> Vec<u8> {
    debug!("decoded {}x{} image", img.width(), img.height());
    img.to_rgba8().into_raw()
}

pub fn extract_palette<P: AsRef<Path>>(path: P, config: &ExtractionConfig) -> Result<Palette> {
    let extractor = PaletteExtractor::new(config.clone())?;
    let pixels = pixels_from_path(path)?;
    Ok(extractor.extract(&pixels)?)
}

pub fn extract_palette_from_memory(bytes: &[u8], config: &ExtractionConfig) -> Result<Palette> {
    let extractor = PaletteExtractor::new(config.clone())?;
    let pixels = pixels_from_memory(bytes)?;
    Ok(extractor.extract(&pixels)?)
}
