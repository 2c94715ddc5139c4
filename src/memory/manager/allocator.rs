/*!
 * Memory Allocator Implementation
 * Admission, placement and splitting
 */

use super::super::types::{Allocation, MemoryError, MemoryResult};
use super::MemoryManager;
use crate::process::{ProcessStatus, ProcessTable};
use tracing::{info, warn};

impl MemoryManager {
    /// Place the request in `slot` of `requests`
    ///
    /// All-or-nothing: on error neither the table nor any request changes.
    /// A split shifts later blocks up one position, so every reference past
    /// the chosen block is renumbered before returning.
    pub fn allocate(&mut self, requests: &mut ProcessTable, slot: usize) -> MemoryResult<Allocation> {
        let (pid, size, holds_block) = match requests.get(slot) {
            Some(request) => (request.id, request.requested_size, request.block_idx.is_some()),
            None => return Err(MemoryError::UnknownRequest { slot }),
        };

        // One block per owner id, whichever request holds it
        if holds_block || self.table.iter().any(|b| b.owner == Some(pid)) {
            warn!("P{} already owns a block, refusing second allocation", pid);
            return Err(MemoryError::AlreadyAllocated { pid });
        }

        // Cheap aggregate check before scanning the table
        if size > self.free_size {
            warn!(
                "P{} requested {} units, only {} free in total",
                pid, size, self.free_size
            );
            return Err(MemoryError::InsufficientTotalFree {
                requested: size,
                available: self.free_size,
            });
        }

        let index = match self.config.strategy.select(&self.table, size) {
            Some(index) => index,
            None => {
                let largest_free = self.table.largest_free();
                warn!(
                    "{}: no block fits P{} ({} units, largest free block {})",
                    self.config.strategy, pid, size, largest_free
                );
                return Err(MemoryError::NoFittingBlock {
                    requested: size,
                    largest_free,
                });
            }
        };

        let chosen = match self.table.at(index) {
            Some(block) => *block,
            None => return Err(MemoryError::InvalidSplit { index, head: size }),
        };

        let leftover = chosen.size - size;
        let split = leftover > self.config.split_threshold;
        if split {
            if let Err(e) = self.table.split_at(index, size) {
                warn!("Cannot split block {} for P{}: {}", index, pid, e);
                return Err(e);
            }
            requests.renumber_from(index);
        }

        let block_size = match self.table.at_mut(index) {
            Some(block) => {
                block.assign(pid);
                block.size
            }
            None => return Err(MemoryError::InvalidSplit { index, head: size }),
        };

        if let Some(request) = requests.get_mut(slot) {
            request.status = ProcessStatus::Active;
            request.block_idx = Some(index);
        }
        self.free_size -= size;

        info!(
            "{}: allocated {} units at {} for P{} (block {}, {} units{})",
            self.config.strategy,
            size,
            chosen.start,
            pid,
            index,
            block_size,
            if split { ", split" } else { "" }
        );

        Ok(Allocation {
            pid,
            index,
            start: chosen.start,
            requested: size,
            block_size,
            split,
        })
    }
}
