/*!
 * Tracing
 * Structured logging setup and run timing using the tracing crate
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::Instant;
use tracing::{debug, info, info_span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Filter used when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PARTSIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Logs go to stderr so reports on stdout stay clean.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .ok();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .ok();
        debug!("Structured tracing initialized");
    }
}

/// Times a named operation and logs its duration when dropped
pub struct OperationTimer {
    span: tracing::Span,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            span: info_span!("operation", name = operation),
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> u128 {
        self.start.elapsed().as_micros()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        debug!(duration_us = self.elapsed_us(), "operation completed");
    }
}
