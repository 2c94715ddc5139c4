/*!
 * Memory Module
 * Partition allocation over a fixed-size pool
 */

pub mod config;
pub mod fragmentation;
pub mod manager;
pub mod strategy;
pub mod table;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use config::{AllocatorConfig, ConfigError};
pub use fragmentation::{analyze, FragmentationStats};
pub use manager::MemoryManager;
pub use strategy::{BestFit, FirstFit, FitKind, WorstFit};
pub use table::BlockTable;
pub use traits::*;
pub use types::*;
