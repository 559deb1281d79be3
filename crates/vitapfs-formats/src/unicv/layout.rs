//! Page layout arithmetic
//!
//! A signature block always occupies one whole page. Its header declares the
//! byte size of a *full* block, even when the block is the partially filled
//! last block of a file table; the unused entries are present as zero tail.

use crate::unicv::constants::SIG_BLOCK_HEADER_SIZE;

/// Number of signature entries that fit in one page after the block header
pub fn max_entries_per_page(signature_size: u32, page_size: u32) -> u32 {
    page_size
        .saturating_sub(SIG_BLOCK_HEADER_SIZE)
        .checked_div(signature_size)
        .unwrap_or(0)
}

/// Byte size of a signature block holding `entry_count` entries
pub fn signature_block_byte_size(signature_size: u32, entry_count: u32) -> u64 {
    u64::from(entry_count) * u64::from(signature_size) + u64::from(SIG_BLOCK_HEADER_SIZE)
}

/// Split a sector count into full-capacity blocks and a remainder
///
/// Returns `(full_blocks, remainder)`. A zero capacity yields `(0, 0)`.
pub fn split_sectors(sector_count: u32, capacity: u32) -> (u32, u32) {
    if capacity == 0 {
        return (0, 0);
    }
    (sector_count / capacity, sector_count % capacity)
}

/// Number of signature blocks needed to cover `sector_count` sectors
pub fn signature_block_count(sector_count: u32, capacity: u32) -> u32 {
    let (full, remainder) = split_sectors(sector_count, capacity);
    full + u32::from(remainder > 0)
}

/// Expected entry count of each signature block of a file table, in order
pub fn block_entry_counts(sector_count: u32, capacity: u32) -> impl Iterator<Item = u32> {
    let (full, remainder) = split_sectors(sector_count, capacity);
    std::iter::repeat_n(capacity, full as usize).chain((remainder > 0).then_some(remainder))
}
