use crate::color::ColorKey;
use crate::sampler::FrequencyTable;

/// Orders colors by descending count. Ties keep first-seen order since the table
/// yields entries in insertion order and `sort_by` is stable.
pub fn rank(table: FrequencyTable) -> Vec<ColorKey> {
    let mut entries = table.into_entries();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.into_iter().map(|e| e.color).collect()
}
