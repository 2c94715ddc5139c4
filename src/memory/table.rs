/*!
 * Block Table
 * Ordered, gap-free sequence of segments covering the pool
 */

use super::types::{MemoryBlock, MemoryError, MemoryResult};
use crate::core::types::{BlockIndex, Size};
use serde::Serialize;
use tracing::debug;

/// Ordered block table
///
/// Blocks are sorted by start address, never overlap, leave no gaps and
/// never have zero size. The sizes always sum to the pool capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTable {
    blocks: Vec<MemoryBlock>,
    capacity: Size,
    max_blocks: usize,
}

impl BlockTable {
    /// Create a table holding one free block spanning the whole pool
    pub fn new(capacity: Size, max_blocks: usize) -> Self {
        Self {
            blocks: vec![MemoryBlock::free(0, capacity)],
            capacity,
            max_blocks,
        }
    }

    pub fn count(&self) -> usize {
        self.blocks.len()
    }

    pub fn at(&self, index: BlockIndex) -> Option<&MemoryBlock> {
        self.blocks.get(index)
    }

    pub(crate) fn at_mut(&mut self, index: BlockIndex) -> Option<&mut MemoryBlock> {
        self.blocks.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemoryBlock> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.max_blocks
    }

    /// Free blocks in address order
    pub fn free_blocks(&self) -> impl Iterator<Item = &MemoryBlock> + '_ {
        self.blocks.iter().filter(|b| b.free)
    }

    /// Sum of all free block sizes
    pub fn free_size(&self) -> Size {
        self.free_blocks().map(|b| b.size).sum()
    }

    pub fn largest_free(&self) -> Size {
        self.free_blocks().map(|b| b.size).max().unwrap_or(0)
    }

    /// Split free block `index` into a head of `head` units and a free tail
    ///
    /// The tail is inserted directly after `index`; every later block moves
    /// up one position.
    pub fn split_at(&mut self, index: BlockIndex, head: Size) -> MemoryResult<()> {
        let block = match self.blocks.get(index) {
            Some(block) if block.free && head > 0 && head < block.size => *block,
            _ => return Err(MemoryError::InvalidSplit { index, head }),
        };

        if self.is_full() {
            return Err(MemoryError::TableFull {
                max_blocks: self.max_blocks,
            });
        }

        let tail = MemoryBlock::free(block.start + head, block.size - head);
        self.blocks[index].size = head;
        self.blocks.insert(index + 1, tail);

        debug!(
            index,
            head,
            tail = tail.size,
            tail_start = tail.start,
            "Split block"
        );
        Ok(())
    }

    /// Fold free block `index + 1` into free block `index`
    ///
    /// Returns the removed position; references greater than it must be
    /// decremented by the caller.
    pub fn remove_merge_at(&mut self, index: BlockIndex) -> MemoryResult<BlockIndex> {
        let removed = index + 1;
        match (self.blocks.get(index), self.blocks.get(removed)) {
            (Some(left), Some(right)) if left.free && right.free => {}
            _ => return Err(MemoryError::InvalidMerge { index }),
        }

        let right = self.blocks.remove(removed);
        self.blocks[index].size += right.size;
        Ok(removed)
    }

    /// First position `i` where blocks `i` and `i + 1` are both free
    pub fn first_adjacent_free_pair(&self) -> Option<BlockIndex> {
        self.blocks
            .windows(2)
            .position(|pair| pair[0].free && pair[1].free)
    }

    /// Verify ordering, contiguity, size conservation and ownership rules
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut expected_start = 0;
        let mut owners = std::collections::HashSet::new();

        for (i, block) in self.blocks.iter().enumerate() {
            if block.size == 0 {
                return Err(format!("block {} has zero size", i));
            }
            if block.start != expected_start {
                return Err(format!(
                    "block {} starts at {} but previous block ends at {}",
                    i, block.start, expected_start
                ));
            }
            match (block.free, block.owner) {
                (true, Some(pid)) => {
                    return Err(format!("free block {} still owned by P{}", i, pid))
                }
                (false, None) => return Err(format!("allocated block {} has no owner", i)),
                (false, Some(pid)) if !owners.insert(pid) => {
                    return Err(format!("P{} owns more than one block", pid))
                }
                _ => {}
            }
            expected_start = block.end();
        }

        if expected_start != self.capacity {
            return Err(format!(
                "blocks cover {} units, pool holds {}",
                expected_start, self.capacity
            ));
        }
        Ok(())
    }
}
