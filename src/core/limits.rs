/*!
 * System Limits and Constants
 *
 * Centralized location for the fixed bounds of the simulator.
 * Values are grouped by domain.
 */

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Maximum number of segments the block table may hold
/// A split that would exceed this is rejected with `TableFull`
pub const MAX_MEM_BLKS: usize = 100;

/// Leftover size at or below which a chosen block is handed out whole
/// instead of being split
pub const DEFAULT_SPLIT_THRESHOLD: usize = 10;

// =============================================================================
// PROCESS LIMITS
// =============================================================================

/// Maximum number of process descriptors accepted from an input file
pub const MAX_PROCESSES: usize = 20;

/// Identifier used for the large allocation issued in the final phase
pub const LARGE_PROCESS_ID: u32 = 9999;

/// Default lifetime recorded for descriptors that omit a duration
pub const DEFAULT_PROCESS_DURATION: u32 = 10;

// =============================================================================
// DRIVER DEFAULTS
// =============================================================================

/// Input file used when none is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

/// Default size of the large allocation, as a percentage of free memory
pub const DEFAULT_LARGE_PERCENT: f64 = 50.0;

/// Environment variable overriding the split threshold
pub const ENV_SPLIT_THRESHOLD: &str = "PARTSIM_SPLIT_THRESHOLD";

/// Environment variable overriding the block table capacity
pub const ENV_MAX_BLOCKS: &str = "PARTSIM_MAX_BLOCKS";

/// Environment variable enabling JSON trace output
pub const ENV_TRACE_JSON: &str = "PARTSIM_TRACE_JSON";
