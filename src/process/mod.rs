/*!
 * Process Module
 * Requests and the request table
 */

pub mod table;
pub mod types;

// Re-export for convenience
pub use table::ProcessTable;
pub use types::*;
