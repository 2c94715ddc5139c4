/*!
 * Memory Management
 *
 * Contiguous partition allocator over a fixed-size pool.
 *
 * ## Allocation
 *
 * A request is admitted only if the pool holds enough free units in
 * aggregate; the configured fit strategy then picks a block. A block whose
 * leftover exceeds the split threshold is split into an allocated head and
 * a free tail, otherwise it is handed out whole. A split moves later
 * blocks up one position, and request references past it follow.
 *
 * ## Reclamation
 *
 * Releasing a block coalesces adjacent free blocks until none remain.
 * Every merge removes one table position, and all request references past
 * that position are shifted down before the next merge.
 */

mod allocator;
mod reclaim;

use super::config::{AllocatorConfig, ConfigError};
use super::fragmentation::{self, FragmentationStats};
use super::table::BlockTable;
use super::traits::{Allocator, MemoryInfo};
use super::types::{Allocation, MemoryResult, Reclamation};
use crate::core::types::Size;
use crate::process::ProcessTable;
use tracing::info;

/// Memory manager
///
/// Owns the block table of one strategy run together with the running
/// count of free units.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    config: AllocatorConfig,
    table: BlockTable,
    // capacity minus the sizes charged to active requests
    free_size: Size,
}

impl MemoryManager {
    pub fn new(config: AllocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            capacity = config.pool_capacity,
            strategy = %config.strategy,
            split_threshold = config.split_threshold,
            max_blocks = config.max_blocks,
            "Memory manager initialized"
        );
        Ok(Self {
            table: BlockTable::new(config.pool_capacity, config.max_blocks),
            free_size: config.pool_capacity,
            config,
        })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    pub fn capacity(&self) -> Size {
        self.config.pool_capacity
    }

    pub fn free_size(&self) -> Size {
        self.free_size
    }

    pub fn used_size(&self) -> Size {
        self.config.pool_capacity - self.free_size
    }
}

impl Allocator for MemoryManager {
    fn allocate(&mut self, requests: &mut ProcessTable, slot: usize) -> MemoryResult<Allocation> {
        MemoryManager::allocate(self, requests, slot)
    }

    fn free(&mut self, requests: &mut ProcessTable, slot: usize) -> Reclamation {
        MemoryManager::free(self, requests, slot)
    }
}

impl MemoryInfo for MemoryManager {
    fn analyze(&self) -> FragmentationStats {
        fragmentation::analyze(&self.table, self.free_size)
    }

    fn info(&self) -> (Size, Size, Size) {
        (self.capacity(), self.used_size(), self.free_size)
    }
}
