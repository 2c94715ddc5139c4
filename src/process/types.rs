/*!
 * Process Types
 * Requests competing for space in the pool
 */

use crate::core::limits::DEFAULT_PROCESS_DURATION;
use crate::core::types::{BlockIndex, Pid, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Not yet placed
    New,
    /// Holding a block
    Active,
    /// Released its block
    Done,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessStatus::New => write!(f, "Unallocated"),
            ProcessStatus::Active => write!(f, "Running"),
            ProcessStatus::Done => write!(f, "Terminated"),
        }
    }
}

/// Validated process descriptor as read from the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub id: Pid,
    pub size: Size,
    /// Recorded for completeness; the engines do not schedule by time
    pub arrival: u32,
    pub duration: u32,
}

impl ProcessDescriptor {
    pub fn new(id: Pid, size: Size) -> Self {
        Self {
            id,
            size,
            arrival: 0,
            duration: DEFAULT_PROCESS_DURATION,
        }
    }
}

/// A process competing for memory
///
/// `block_idx` is a position in the block table, not an owning handle.
/// It is kept valid by the reclamation engine whenever coalescing removes
/// an earlier block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub id: Pid,
    pub requested_size: Size,
    pub status: ProcessStatus,
    pub block_idx: Option<BlockIndex>,
}

impl ProcessRequest {
    pub fn new(id: Pid, requested_size: Size) -> Self {
        Self {
            id,
            requested_size,
            status: ProcessStatus::New,
            block_idx: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProcessStatus::Active
    }
}

impl From<&ProcessDescriptor> for ProcessRequest {
    fn from(desc: &ProcessDescriptor) -> Self {
        Self::new(desc.id, desc.size)
    }
}

/// Number of requests in each lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub running: usize,
    pub terminated: usize,
    pub unallocated: usize,
}
