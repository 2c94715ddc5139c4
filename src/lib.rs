/*!
 * Partition Allocation Simulator
 * Contiguous-memory placement strategies compared over scripted workloads
 */

pub mod core;
pub mod loader;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{SimError, SimResult};
pub use loader::{load_from_path, load_from_str, LoadWarning, LoaderError, Workload};
pub use memory::{
    AllocatorConfig, BlockTable, FitKind, FragmentationStats, MemoryBlock, MemoryError,
    MemoryManager,
};
pub use monitoring::init_tracing;
pub use process::{ProcessDescriptor, ProcessRequest, ProcessStatus, ProcessTable};
pub use simulation::{compare, Comparison, Session, SimulationPlan, StrategyReport, Termination};
