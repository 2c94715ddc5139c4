/*!
 * Simulation Module
 * Scripted strategy runs and their statistics
 */

pub mod compare;
pub mod plan;
pub mod session;
pub mod stats;

// Re-export for convenience
pub use compare::{compare, compare_strategies, Comparison};
pub use plan::{PlanError, SimulationPlan, Termination};
pub use session::{
    Phase, PhaseRecord, PhaseSnapshot, RequestView, Session, SessionEvent, StrategyReport,
};
pub use stats::{AllocationCounters, SimulationStats, UtilizationTracker};
