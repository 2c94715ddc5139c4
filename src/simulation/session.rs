/*!
 * Simulation Session
 *
 * One strategy run: an independent block table plus its own copy of the
 * request set, driven through the four scripted phases.
 */

use super::plan::{PlanError, SimulationPlan, Termination};
use super::stats::{AllocationCounters, SimulationStats, UtilizationTracker};
use crate::core::limits::LARGE_PROCESS_ID;
use crate::core::types::{Address, Pid, Size};
use crate::memory::{
    Allocation, AllocatorConfig, ConfigError, FitKind, MemoryBlock, MemoryError, MemoryInfo,
    MemoryManager, MemoryResult, MergeEvent,
};
use crate::process::{ProcessDescriptor, ProcessRequest, ProcessStatus, ProcessTable, StatusCounts};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, info_span, warn};

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InitialAllocation,
    Termination,
    AdditionalAllocation,
    LargeAllocation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::InitialAllocation => write!(f, "Phase 1: Initial Process Allocation"),
            Phase::Termination => write!(f, "Phase 2: Process Termination"),
            Phase::AdditionalAllocation => write!(f, "Phase 3: Additional Process Allocation"),
            Phase::LargeAllocation => write!(f, "Phase 4: Large Process Allocation"),
        }
    }
}

/// Something that happened during a run, for an external reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Allocated(Allocation),
    AllocationFailed {
        pid: Pid,
        size: Size,
        error: MemoryError,
    },
    Freed {
        pid: Pid,
        block: MemoryBlock,
    },
    Coalesced(MergeEvent),
    /// Asked to terminate a process that is not running
    TerminateMissed {
        pid: Pid,
    },
}

/// Memory and process state at the end of a phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    pub used: Size,
    pub free: Size,
    pub block_count: usize,
    pub free_block_count: usize,
    pub processes: StatusCounts,
    pub utilization: f64,
}

/// Events and closing state of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub events: Vec<SessionEvent>,
    pub snapshot: PhaseSnapshot,
}

/// Request as seen by a reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    pub id: Pid,
    pub requested_size: Size,
    pub status: ProcessStatus,
    pub start: Option<Address>,
}

/// Everything a reporter needs about a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: FitKind,
    pub config: AllocatorConfig,
    pub stats: SimulationStats,
    pub phases: Vec<PhaseRecord>,
    pub blocks: Vec<MemoryBlock>,
    pub requests: Vec<RequestView>,
    pub capacity: Size,
    pub free: Size,
}

/// A single strategy run
#[derive(Debug, Clone)]
pub struct Session {
    manager: MemoryManager,
    requests: ProcessTable,
    counters: AllocationCounters,
    utilization: UtilizationTracker,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: AllocatorConfig, descriptors: &[ProcessDescriptor]) -> Result<Self, ConfigError> {
        Ok(Self {
            manager: MemoryManager::new(config)?,
            requests: ProcessTable::from_descriptors(descriptors),
            counters: AllocationCounters::default(),
            utilization: UtilizationTracker::default(),
            events: Vec::new(),
        })
    }

    pub fn manager(&self) -> &MemoryManager {
        &self.manager
    }

    pub fn requests(&self) -> &ProcessTable {
        &self.requests
    }

    pub fn counters(&self) -> AllocationCounters {
        self.counters
    }

    /// Events recorded since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Attempt to place the request in `slot`, counting the attempt
    ///
    /// Returns `None` for an unknown slot, which is not counted.
    pub fn allocate_slot(&mut self, slot: usize) -> Option<MemoryResult<Allocation>> {
        let request = self.requests.get(slot)?;
        let (pid, size) = (request.id, request.requested_size);
        let result = self.manager.allocate(&mut self.requests, slot);
        self.record_allocation(pid, size, &result);
        Some(result)
    }

    fn record_allocation(&mut self, pid: Pid, size: Size, result: &MemoryResult<Allocation>) {
        self.counters.record(result.is_ok());
        self.events.push(match result {
            Ok(allocation) => SessionEvent::Allocated(*allocation),
            Err(error) => SessionEvent::AllocationFailed {
                pid,
                size,
                error: error.clone(),
            },
        });
    }

    /// Free the running process `pid`; false if it is not running
    pub fn terminate(&mut self, pid: Pid) -> bool {
        let slot = match self.requests.find_active(pid) {
            Some(slot) => slot,
            None => {
                warn!("P{} not found or not running", pid);
                self.events.push(SessionEvent::TerminateMissed { pid });
                return false;
            }
        };
        self.free_slot(slot);
        true
    }

    /// Free every running process, returning how many were freed
    pub fn terminate_all(&mut self) -> usize {
        let mut freed = 0;
        for slot in 0..self.requests.len() {
            if self.requests.get(slot).map_or(false, |r| r.is_active()) {
                self.free_slot(slot);
                freed += 1;
            }
        }
        freed
    }

    fn free_slot(&mut self, slot: usize) {
        let pid = match self.requests.get(slot) {
            Some(request) => request.id,
            None => return,
        };
        let reclamation = self.manager.free(&mut self.requests, slot);
        if let Some(block) = reclamation.released {
            self.events.push(SessionEvent::Freed { pid, block });
        }
        self.events
            .extend(reclamation.merges.into_iter().map(SessionEvent::Coalesced));
    }

    /// Allocate `percent` of the current free memory to the large process
    ///
    /// The size is at least one unit. The request joins the request set
    /// before placement so splits and later merges keep its reference
    /// valid; it is withdrawn again if placement fails.
    pub fn allocate_large(&mut self, percent: f64) -> MemoryResult<Allocation> {
        let free = self.manager.free_size();
        let size = ((free as f64 * percent) / 100.0).floor().max(1.0) as Size;
        let slot = self.requests.push(ProcessRequest::new(LARGE_PROCESS_ID, size));

        info!(
            "Attempting large allocation (P{}, {} units - {:.2}% of free memory)",
            LARGE_PROCESS_ID, size, percent
        );
        let result = self.manager.allocate(&mut self.requests, slot);
        self.record_allocation(LARGE_PROCESS_ID, size, &result);
        if result.is_err() {
            self.requests.pop();
        }
        result
    }

    /// Record the current utilization sample and return it
    pub fn sample_utilization(&mut self) -> f64 {
        let utilization = self.manager.utilization();
        self.utilization.sample(utilization);
        utilization
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        let (_, used, free) = self.manager.info();
        PhaseSnapshot {
            used,
            free,
            block_count: self.manager.table().count(),
            free_block_count: self.manager.table().free_blocks().count(),
            processes: self.requests.counts(),
            utilization: self.manager.utilization(),
        }
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            attempts: self.counters.attempts,
            successes: self.counters.successes,
            failures: self.counters.failures,
            peak_utilization: self.utilization.peak(),
            average_utilization: self.utilization.average(),
            fragmentation: self.manager.analyze(),
            final_block_count: self.manager.table().count(),
        }
    }

    /// Requests with the start address of the block each one holds
    pub fn request_views(&self) -> Vec<RequestView> {
        self.requests
            .iter()
            .map(|r| RequestView {
                id: r.id,
                requested_size: r.requested_size,
                status: r.status,
                start: r
                    .block_idx
                    .and_then(|idx| self.manager.table().at(idx))
                    .map(|b| b.start),
            })
            .collect()
    }

    fn close_phase(&mut self, phase: Phase, phases: &mut Vec<PhaseRecord>) {
        self.sample_utilization();
        phases.push(PhaseRecord {
            phase,
            events: self.take_events(),
            snapshot: self.snapshot(),
        });
    }

    /// Drive the four phases of `plan` and report the outcome
    pub fn run(mut self, plan: &SimulationPlan) -> Result<StrategyReport, PlanError> {
        plan.validate()?;
        let strategy = self.manager.config().strategy;
        let span = info_span!("simulation", %strategy);
        let _enter = span.enter();

        let mut phases = Vec::with_capacity(4);

        // Phase 1: the first `initial` requests, at least one
        let initial = plan.initial.clamp(1, self.requests.len().max(1));
        for slot in 0..initial.min(self.requests.len()) {
            self.allocate_slot(slot);
        }
        self.close_phase(Phase::InitialAllocation, &mut phases);

        // Phase 2
        match &plan.termination {
            Termination::None => {}
            Termination::All => {
                let freed = self.terminate_all();
                info!("Terminated all {} running processes", freed);
            }
            Termination::Ids(ids) => {
                let running = self.requests.running_ids().len();
                for pid in ids.iter().take(running) {
                    self.terminate(*pid);
                }
            }
        }
        self.close_phase(Phase::Termination, &mut phases);

        // Phase 3: next `additional` requests still waiting, in input order
        let waiting = self.requests.unallocated_slots();
        for slot in waiting.into_iter().take(plan.additional) {
            self.allocate_slot(slot);
        }
        self.close_phase(Phase::AdditionalAllocation, &mut phases);

        // Phase 4
        if let Err(e) = self.allocate_large(plan.large_percent) {
            warn!("Large allocation failed: {}", e);
        }
        self.close_phase(Phase::LargeAllocation, &mut phases);

        let stats = self.stats();
        info!(
            success_rate = stats.success_rate(),
            peak_utilization = stats.peak_utilization,
            fragmentation = stats.fragmentation.fragmentation_percent,
            blocks = stats.final_block_count,
            "Simulation completed"
        );

        Ok(StrategyReport {
            strategy,
            config: *self.manager.config(),
            stats,
            phases,
            blocks: self.manager.table().blocks().to_vec(),
            requests: self.request_views(),
            capacity: self.manager.capacity(),
            free: self.manager.free_size(),
        })
    }
}
