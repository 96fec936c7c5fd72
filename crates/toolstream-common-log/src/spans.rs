//! Tracing spans for store operations.

use tracing::{debug_span, Span};

/// Create a span for work on one streamed tool call.
pub fn tool_call_span(index: u32, id: Option<&str>) -> Span {
    debug_span!("tool_call", index, id = id.unwrap_or(""), error = tracing::field::Empty)
}

/// Create a span for a store-wide operation.
pub fn store_span(operation: &'static str) -> Span {
    debug_span!("store", op = operation, error = tracing::field::Empty)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        let duration = self.start.elapsed();
        tracing::trace!(
            operation = %self.operation,
            duration_us = %duration.as_micros(),
            "operation completed"
        );
    }
}

/// Macro for timing a block of code.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let _timer = $crate::spans::Timer::start($name);
        let result = $body;
        _timer.finish();
        result
    }};
}

/// Re-export of tracing::instrument for convenience.
pub use tracing::instrument;
