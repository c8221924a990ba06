//! Image decoding front end for `prism-core`.

mod palette;

pub use crate::palette::{
    extract_palette, extract_palette_from_memory, pixels_from_memory, pixels_from_path,
};
