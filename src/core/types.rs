/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Start address of a segment inside the simulated pool (abstract units)
pub type Address = usize;

/// Size type for memory operations (abstract units, nominally KB)
pub type Size = usize;

/// Position of a block inside the ordered block table
pub type BlockIndex = usize;
