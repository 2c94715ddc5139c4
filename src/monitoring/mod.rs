/*!
 * Monitoring Module
 * Logging setup and timing
 */

pub mod tracer;

pub use tracer::{init_tracing, OperationTimer};
