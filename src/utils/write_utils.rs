//! Raster writing utilities
//!
//! Helper functions for laying out TIFF files on disk, handling
//! alignment and tag ordering details.

use crate::raster::errors::PipelineResult;
use crate::raster::IfdEntry;
use std::collections::HashSet;
use std::io::Write;

/// Align an offset to a 4-byte boundary
///
/// TIFF recommends aligning data on word boundaries. Returns the next
/// 4-byte aligned position at or after the given offset.
pub fn align_to_4_bytes(offset: u64) -> u64 {
    let remainder = offset % 4;
    if remainder == 0 {
        offset
    } else {
        offset + (4 - remainder)
    }
}

/// Write padding bytes to align to a 4-byte boundary
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> PipelineResult<()> {
    let padding = (4 - (data_len % 4)) % 4;
    if padding > 0 {
        writer.write_all(&vec![0u8; padding])?;
    }
    Ok(())
}

/// Entries sorted by tag number with duplicates removed
///
/// TIFF requires tags sorted ascending and unique. When multiple
/// entries carry the same tag, the last occurrence wins.
pub fn get_unique_sorted_entries(entries: &[IfdEntry]) -> Vec<IfdEntry> {
    let mut sorted_entries = entries.to_vec();
    sorted_entries.sort_by_key(|entry| entry.tag);

    let mut unique_entries = Vec::new();
    let mut seen_tags = HashSet::new();

    // Walk in reverse so the last occurrence of each tag is kept
    for entry in sorted_entries.iter().rev() {
        if !seen_tags.contains(&entry.tag) {
            seen_tags.insert(entry.tag);
            unique_entries.push(entry.clone());
        }
    }

    unique_entries.reverse();
    unique_entries
}
