use log::trace;
use serde::{Deserialize, Serialize};

use crate::color::ColorKey;

/// The final ordered colors of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<ColorKey>);

impl Palette {
    pub fn colors(&self) -> &[ColorKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorKey> {
        self.0.iter()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(ColorKey::to_hex).collect()
    }

    pub fn into_inner(self) -> Vec<ColorKey> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ColorKey;
    type IntoIter = std::slice::Iter<'a, ColorKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Greedily keeps colors from `ranked`, in order, that are at least
/// `similarity_threshold` away from every color already kept. Stops at `max_colors`.
///
/// A distance exactly equal to the threshold counts as distinct.
pub fn deduplicate(ranked: &[ColorKey], similarity_threshold: f64, max_colors: usize) -> Palette {
    let mut kept: Vec<ColorKey> = Vec::with_capacity(max_colors.min(ranked.len()));

    for candidate in ranked {
        if kept.len() >= max_colors {
            break;
        }
        let mut similar = false;
        for accepted in &kept {
            if candidate.distance(accepted) < similarity_threshold {
                trace!("dropping {candidate}, too close to {accepted}");
                similar = true;
                break;
            }
        }
        if !similar {
            kept.push(*candidate);
        }
    }

    Palette(kept)
}
