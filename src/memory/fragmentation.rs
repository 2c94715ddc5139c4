/*!
 * Fragmentation Analysis
 * Point-in-time metrics derived from the block table
 */

use super::table::BlockTable;
use crate::core::types::Size;
use serde::{Deserialize, Serialize};

/// Fragmentation snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentationStats {
    /// Number of free blocks (external fragments)
    pub free_block_count: usize,
    /// Share of free memory lying outside the largest free block
    pub fragmentation_percent: f64,
    pub average_free_block_size: f64,
    pub largest_free_block: Size,
}

/// Compute fragmentation metrics for `table`
///
/// `free_size` is the engine's running count of free units. The metric is
/// recomputed from scratch on every call.
pub fn analyze(table: &BlockTable, free_size: Size) -> FragmentationStats {
    let mut free_block_count = 0;
    let mut free_total: Size = 0;
    let mut largest_free_block: Size = 0;

    for block in table.free_blocks() {
        free_block_count += 1;
        free_total += block.size;
        largest_free_block = largest_free_block.max(block.size);
    }

    let average_free_block_size = if free_block_count > 0 {
        free_total as f64 / free_block_count as f64
    } else {
        0.0
    };

    let fragmentation_percent = if free_size == 0 || free_block_count <= 1 {
        0.0
    } else {
        free_size.saturating_sub(largest_free_block) as f64 / free_size as f64 * 100.0
    };

    FragmentationStats {
        free_block_count,
        fragmentation_percent,
        average_free_block_size,
        largest_free_block,
    }
}
