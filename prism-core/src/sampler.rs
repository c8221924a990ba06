use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::color::ColorKey;
use crate::config::check_sampling;
use crate::error::{PrismError, Result};

/// Samples per rayon task when sampling in parallel.
const SAMPLES_PER_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    pub color: ColorKey,
    pub count: u64,
}

/// Occurrence counts per color, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<ColorCount>,
    index: HashMap<ColorKey, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, color: ColorKey) {
        self.add(color, 1);
    }

    fn add(&mut self, color: ColorKey, count: u64) {
        match self.index.get(&color) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.count = entry.count.saturating_add(count);
            }
            None => {
                self.index.insert(color, self.entries.len());
                self.entries.push(ColorCount { color, count });
            }
        }
    }

    /// Sums `other` into `self`. Colors new to `self` are appended in `other`'s order,
    /// so merging tables in buffer order keeps first-seen order intact.
    pub fn merge(&mut self, other: FrequencyTable) {
        for entry in other.entries {
            self.add(entry.color, entry.count);
        }
    }

    pub fn count(&self, color: &ColorKey) -> u64 {
        self.index
            .get(color)
            .map(|&i| self.entries[i].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorCount> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ColorCount> {
        self.entries
    }
}

fn check_input(buffer: &[u8], stride: usize, alpha_threshold: u32) -> Result<()> {
    check_sampling(stride, alpha_threshold)?;
    if buffer.len() % 4 != 0 {
        return Err(PrismError::InvalidBufferLength { len: buffer.len() });
    }
    Ok(())
}

fn sample_pixels(pixels: &[u8], stride: usize, alpha_threshold: u32) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for px in pixels.chunks_exact(4).step_by(stride) {
        if (px[3] as u32) < alpha_threshold {
            continue;
        }
        table.record(ColorKey::new(px[0], px[1], px[2]));
    }
    table
}

/// Counts every `stride`-th RGBA pixel of `buffer`, skipping pixels whose alpha is
/// below `alpha_threshold`.
pub fn sample(buffer: &[u8], stride: usize, alpha_threshold: u32) -> Result<FrequencyTable> {
    check_input(buffer, stride, alpha_threshold)?;
    let table = sample_pixels(buffer, stride, alpha_threshold);
    debug!(
        "sampled {} pixels (stride {}), {} distinct colors",
        buffer.len() / 4,
        stride,
        table.len()
    );
    Ok(table)
}

/// Same result as [`sample`], computed on the rayon pool.
///
/// Chunks start on a multiple of `stride` so every chunk samples the same pixel indices
/// the sequential scan would, and partial tables are merged in buffer order.
pub fn sample_parallel(
    buffer: &[u8],
    stride: usize,
    alpha_threshold: u32,
) -> Result<FrequencyTable> {
    check_input(buffer, stride, alpha_threshold)?;
    let chunk_bytes = stride.saturating_mul(SAMPLES_PER_CHUNK).saturating_mul(4);
    let partials: Vec<FrequencyTable> = buffer
        .par_chunks(chunk_bytes)
        .map(|chunk| sample_pixels(chunk, stride, alpha_threshold))
        .collect();

    let mut table = FrequencyTable::new();
    for partial in partials {
        table.merge(partial);
    }
    debug!(
        "sampled {} pixels in parallel (stride {}), {} distinct colors",
        buffer.len() / 4,
        stride,
        table.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels(px: &[[u8; 4]]) -> Vec<u8> {
        px.iter().flatten().copied().collect()
    }

    #[test]
    fn counts_identical_pixels() {
        let buffer = pixels(&[[255, 0, 0, 255]; 4]);
        let table = sample(&buffer, 1, 128).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&ColorKey::new(255, 0, 0)), 4);
    }

    #[test]
    fn skips_pixels_below_alpha_threshold() {
        let buffer = pixels(&[[10, 10, 10, 50], [20, 20, 20, 128], [30, 30, 30, 127]]);
        let table = sample(&buffer, 1, 128).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&ColorKey::new(10, 10, 10)), 0);
        assert_eq!(table.count(&ColorKey::new(20, 20, 20)), 1);
    }

    #[test]
    fn zero_alpha_threshold_keeps_transparent_pixels() {
        let buffer = pixels(&[[1, 2, 3, 0]]);
        let table = sample(&buffer, 1, 0).unwrap();
        assert_eq!(table.count(&ColorKey::new(1, 2, 3)), 1);
    }

    #[test]
    fn walks_buffer_at_stride() {
        let buffer = pixels(&[
            [0, 0, 0, 255],
            [1, 1, 1, 255],
            [2, 2, 2, 255],
            [0, 0, 0, 255],
            [4, 4, 4, 255],
        ]);
        let table = sample(&buffer, 3, 128).unwrap();
        let seen: Vec<_> = table.iter().copied().collect();
        assert_eq!(
            seen,
            vec![ColorCount { color: ColorKey::new(0, 0, 0), count: 2 }]
        );
    }

    #[test]
    fn keeps_first_seen_order() {
        let buffer = pixels(&[
            [9, 9, 9, 255],
            [1, 1, 1, 255],
            [9, 9, 9, 255],
            [5, 5, 5, 255],
        ]);
        let table = sample(&buffer, 1, 128).unwrap();
        let order: Vec<_> = table.iter().map(|e| e.color.r).collect();
        assert_eq!(order, vec![9, 1, 5]);
    }

    #[test]
    fn empty_buffer_is_empty_table() {
        assert!(sample(&[], 5, 128).unwrap().is_empty());
    }

    #[test]
    fn rejects_ragged_buffer() {
        let err = sample(&[0, 0, 0, 255, 1], 1, 128).unwrap_err();
        assert!(matches!(err, PrismError::InvalidBufferLength { len: 5 }));
        assert!(sample_parallel(&[0, 0], 1, 128).is_err());
    }

    #[test]
    fn rejects_zero_stride() {
        let err = sample(&[0, 0, 0, 255], 0, 128).unwrap_err();
        assert!(matches!(err, PrismError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_alpha_threshold_above_255() {
        let err = sample(&[10, 20, 30, 255], 1, 300).unwrap_err();
        assert!(matches!(err, PrismError::InvalidConfiguration(_)));
        let err = sample_parallel(&[10, 20, 30, 255], 1, 256).unwrap_err();
        assert!(matches!(err, PrismError::InvalidConfiguration(_)));
        assert_eq!(sample(&[10, 20, 30, 255], 1, 255).unwrap().len(), 1);
    }

    #[test]
    fn counts_saturate_instead_of_overflowing() {
        let color = ColorKey::new(1, 2, 3);
        let mut table = FrequencyTable::new();
        table.add(color, u64::MAX - 1);
        table.record(color);
        table.record(color);
        assert_eq!(table.count(&color), u64::MAX);
    }

    #[test]
    fn merge_sums_counts_and_appends_new_colors() {
        let mut a = sample(&pixels(&[[1, 1, 1, 255], [2, 2, 2, 255]]), 1, 0).unwrap();
        let b = sample(&pixels(&[[3, 3, 3, 255], [1, 1, 1, 255]]), 1, 0).unwrap();
        a.merge(b);
        let seen: Vec<_> = a.iter().map(|e| (e.color.r, e.count)).collect();
        assert_eq!(seen, vec![(1, 2), (2, 1), (3, 1)]);
    }

    #[test]
    fn parallel_matches_sequential() {
        // Enough pixels to span several chunks at stride 3.
        let n = SAMPLES_PER_CHUNK * 3 * 5 + 7;
        let buffer: Vec<u8> = (0..n)
            .flat_map(|i| {
                let v = (i * 37 % 251) as u8;
                [v, v / 3, v / 7, if i % 11 == 0 { 0 } else { 255 }]
            })
            .collect();
        for stride in [1, 3, 5] {
            let sequential = sample(&buffer, stride, 128).unwrap();
            let parallel = sample_parallel(&buffer, stride, 128).unwrap();
            assert_eq!(sequential.into_entries(), parallel.into_entries());
        }
    }
}
