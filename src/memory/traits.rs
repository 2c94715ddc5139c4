/*!
 * Memory Traits
 * Partition management abstractions
 */

use super::fragmentation::FragmentationStats;
use super::table::BlockTable;
use super::types::*;
use crate::core::types::{BlockIndex, Size};
use crate::process::ProcessTable;

/// Placement policy interface
///
/// Implementations are pure: the same table and size always yield the
/// same answer and nothing is cached between calls.
pub trait FitStrategy: Send + Sync {
    /// Index of the block to satisfy `size`, or `None` if no block qualifies
    fn select(&self, table: &BlockTable, size: Size) -> Option<BlockIndex>;
}

/// Allocation and reclamation interface
pub trait Allocator {
    /// Place the request in `slot`, keeping every reference in `requests`
    /// valid across the split
    fn allocate(&mut self, requests: &mut ProcessTable, slot: usize) -> MemoryResult<Allocation>;

    /// Release the block held by slot `slot` and coalesce
    fn free(&mut self, requests: &mut ProcessTable, slot: usize) -> Reclamation;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Fragmentation snapshot of the current table
    fn analyze(&self) -> FragmentationStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    /// Fraction of the pool currently charged to processes
    fn utilization(&self) -> f64 {
        let (total, used, _) = self.info();
        if total == 0 {
            0.0
        } else {
            used as f64 / total as f64
        }
    }
}
