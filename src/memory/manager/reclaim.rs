/*!
 * Memory Reclamation
 * Release and coalescing with reference renumbering
 */

use super::super::types::{MergeEvent, Reclamation};
use super::MemoryManager;
use crate::process::{ProcessStatus, ProcessTable};
use tracing::{debug, error, info};

impl MemoryManager {
    /// Release the block held by the request in `slot` and coalesce
    ///
    /// A request holding no block is left alone, so freeing twice is a
    /// no-op.
    pub fn free(&mut self, requests: &mut ProcessTable, slot: usize) -> Reclamation {
        let (pid, charged, index) = match requests.get(slot) {
            Some(request) => match request.block_idx {
                Some(index) => (request.id, request.requested_size, index),
                None => return Reclamation::default(),
            },
            None => return Reclamation::default(),
        };

        let released = match self.table.at_mut(index) {
            Some(block) => {
                let before = *block;
                block.release();
                before
            }
            None => {
                error!("P{} references block {} past the end of the table", pid, index);
                return Reclamation::default();
            }
        };

        self.free_size += charged;
        if let Some(request) = requests.get_mut(slot) {
            request.status = ProcessStatus::Done;
            request.block_idx = None;
        }

        info!(
            "Freed block {} ({} units at {}) held by P{}",
            index, released.size, released.start, pid
        );

        let merges = self.coalesce(requests);
        Reclamation {
            released: Some(released),
            merges,
        }
    }

    /// Merge adjacent free blocks until no pair remains
    ///
    /// Each merge restarts the scan from the first block and renumbers
    /// every request reference past the removed position.
    pub fn coalesce(&mut self, requests: &mut ProcessTable) -> Vec<MergeEvent> {
        let mut merges = Vec::new();

        while let Some(index) = self.table.first_adjacent_free_pair() {
            let (left, right) = match (self.table.at(index), self.table.at(index + 1)) {
                (Some(left), Some(right)) => (*left, *right),
                _ => break,
            };

            let removed = match self.table.remove_merge_at(index) {
                Ok(removed) => removed,
                Err(e) => {
                    error!("Coalescing stopped at block {}: {}", index, e);
                    break;
                }
            };
            requests.renumber_after(removed);

            debug!(
                left_start = left.start,
                right_start = right.start,
                merged = left.size + right.size,
                "Coalesced adjacent free blocks"
            );
            merges.push(MergeEvent {
                left_start: left.start,
                right_start: right.start,
                left_size: left.size,
                right_size: right.size,
                removed_index: removed,
            });
        }

        if !merges.is_empty() {
            info!(
                "Completed {} coalescing operations, {} blocks remain",
                merges.len(),
                self.table.count()
            );
        }
        merges
    }
}
