/*!
 * Simulation Statistics
 * Counters and utilization samples kept by a session
 */

use crate::memory::FragmentationStats;
use serde::{Deserialize, Serialize};

/// Allocation attempt counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCounters {
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
}

impl AllocationCounters {
    pub fn record(&mut self, success: bool) {
        self.attempts += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }
}

/// Utilization samples taken at phase boundaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilizationTracker {
    total: f64,
    samples: usize,
    peak: f64,
}

impl UtilizationTracker {
    pub fn sample(&mut self, utilization: f64) {
        self.total += utilization;
        self.samples += 1;
        if self.samples == 1 || utilization > self.peak {
            self.peak = utilization;
        }
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn average(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total / self.samples as f64
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// End-of-run summary for one strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
    /// Fractions in `[0, 1]`
    pub peak_utilization: f64,
    pub average_utilization: f64,
    pub fragmentation: FragmentationStats,
    pub final_block_count: usize,
}

impl SimulationStats {
    /// Successful attempts as a percentage (0 when nothing was attempted)
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64 * 100.0
        }
    }
}
