/*!
 * Memory Types
 * Common types for partition management
 */

use crate::core::types::{Address, BlockIndex, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every variant is recoverable: a failed operation leaves the block
/// table and the request untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Insufficient free memory: requested {requested} units, {available} units free in total")]
    #[diagnostic(
        code(memory::insufficient_total_free),
        help("The pool does not hold enough free memory in aggregate. Terminate processes first.")
    )]
    InsufficientTotalFree { requested: Size, available: Size },

    #[error("No fitting block: requested {requested} units, largest free block is {largest_free} units")]
    #[diagnostic(
        code(memory::no_fitting_block),
        help("Free memory is fragmented across non-contiguous blocks.")
    )]
    NoFittingBlock { requested: Size, largest_free: Size },

    #[error("Block table full: cannot split beyond {max_blocks} blocks")]
    #[diagnostic(
        code(memory::table_full),
        help("Raise max_blocks or lower the split threshold.")
    )]
    TableFull { max_blocks: usize },

    #[error("Process {pid} already owns a block")]
    #[diagnostic(
        code(memory::already_allocated),
        help("Process ids must be unique among allocated blocks. Free the owner first.")
    )]
    AlreadyAllocated { pid: Pid },

    #[error("No request in slot {slot}")]
    #[diagnostic(code(memory::unknown_request))]
    UnknownRequest { slot: usize },

    #[error("Invalid split of block {index} with head size {head}")]
    #[diagnostic(code(memory::invalid_split))]
    InvalidSplit { index: BlockIndex, head: Size },

    #[error("Invalid merge at block {index}: both neighbours must exist and be free")]
    #[diagnostic(code(memory::invalid_merge))]
    InvalidMerge { index: BlockIndex },
}

/// A contiguous segment of the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub start: Address,
    pub size: Size,
    pub free: bool,
    pub owner: Option<Pid>,
}

impl MemoryBlock {
    /// A free segment with no owner
    pub fn free(start: Address, size: Size) -> Self {
        Self {
            start,
            size,
            free: true,
            owner: None,
        }
    }

    /// One past the last unit covered by this block
    pub fn end(&self) -> Address {
        self.start + self.size
    }

    pub fn is_allocated(&self) -> bool {
        !self.free
    }

    pub(crate) fn assign(&mut self, pid: Pid) {
        self.free = false;
        self.owner = Some(pid);
    }

    pub(crate) fn release(&mut self) {
        self.free = true;
        self.owner = None;
    }
}

/// Result of a successful allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub pid: Pid,
    pub index: BlockIndex,
    pub start: Address,
    pub requested: Size,
    /// Size of the block handed out; exceeds `requested` when the leftover
    /// was too small to split off
    pub block_size: Size,
    pub split: bool,
}

impl Allocation {
    /// Units handed out beyond the requested size
    pub fn internal_waste(&self) -> Size {
        self.block_size - self.requested
    }
}

/// One coalescing step: the block at `right_start` folded into `left_start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    pub left_start: Address,
    pub right_start: Address,
    pub left_size: Size,
    pub right_size: Size,
    /// Table position that disappeared
    pub removed_index: BlockIndex,
}

impl MergeEvent {
    pub fn merged_size(&self) -> Size {
        self.left_size + self.right_size
    }
}

/// Outcome of releasing a request's block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reclamation {
    /// The block as it was released, before coalescing; `None` when the
    /// request held nothing
    pub released: Option<MemoryBlock>,
    pub merges: Vec<MergeEvent>,
}

impl Reclamation {
    pub fn is_noop(&self) -> bool {
        self.released.is_none()
    }
}
