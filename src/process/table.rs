/*!
 * Process Table
 * The request set of one simulation run
 */

use super::types::{ProcessDescriptor, ProcessRequest, ProcessStatus, StatusCounts};
use crate::core::types::{BlockIndex, Pid};
use serde::Serialize;

/// Ordered set of requests
///
/// Cloning yields an independent copy, so each strategy run can mutate
/// its own requests without affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessTable {
    requests: Vec<ProcessRequest>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: &[ProcessDescriptor]) -> Self {
        Self {
            requests: descriptors.iter().map(ProcessRequest::from).collect(),
        }
    }

    pub fn push(&mut self, request: ProcessRequest) -> usize {
        self.requests.push(request);
        self.requests.len() - 1
    }

    /// Remove and return the most recently pushed request
    pub fn pop(&mut self) -> Option<ProcessRequest> {
        self.requests.pop()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&ProcessRequest> {
        self.requests.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut ProcessRequest> {
        self.requests.get_mut(slot)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRequest> {
        self.requests.iter()
    }

    /// Slot of the running request with `pid`
    pub fn find_active(&self, pid: Pid) -> Option<usize> {
        self.requests
            .iter()
            .position(|r| r.id == pid && r.is_active())
    }

    /// Slots of requests not yet placed, in input order
    pub fn unallocated_slots(&self) -> Vec<usize> {
        self.slots_with(ProcessStatus::New)
    }

    /// Ids of running requests, in input order
    pub fn running_ids(&self) -> Vec<Pid> {
        self.requests
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.id)
            .collect()
    }

    fn slots_with(&self, status: ProcessStatus) -> Vec<usize> {
        self.requests
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == status)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for request in &self.requests {
            match request.status {
                ProcessStatus::Active => counts.running += 1,
                ProcessStatus::Done => counts.terminated += 1,
                ProcessStatus::New => counts.unallocated += 1,
            }
        }
        counts
    }

    /// Shift every reference past `removed` down by one
    ///
    /// Applies to all requests regardless of status.
    pub fn renumber_after(&mut self, removed: BlockIndex) {
        for request in &mut self.requests {
            if let Some(idx) = request.block_idx.as_mut() {
                if *idx > removed {
                    *idx -= 1;
                }
            }
        }
    }

    /// Shift every reference past `inserted` up by one
    ///
    /// Called after a split places a new block at `inserted + 1`.
    pub fn renumber_from(&mut self, inserted: BlockIndex) {
        for request in &mut self.requests {
            if let Some(idx) = request.block_idx.as_mut() {
                if *idx > inserted {
                    *idx += 1;
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a ProcessTable {
    type Item = &'a ProcessRequest;
    type IntoIter = std::slice::Iter<'a, ProcessRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}
