//! Logging utilities for go-wordcloud.
//!
//! Structured diagnostics go to stderr through `tracing`, keeping stdout for
//! the human-readable status lines of a run.

use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::WordCloudError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Calling this twice is harmless.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    debug!(operation = operation, "Starting operation");

    let result = f();

    info!(
        operation = operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log what was read from the input table
pub fn log_table_load_stats(path: &Path, rows: usize, bp: usize, cc: usize, mf: usize) {
    info!(
        operation = "table_load",
        path = %path.display(),
        rows = rows,
        bp = bp,
        cc = cc,
        mf = mf,
        "Table loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &WordCloudError, context: &str) {
    error!(
        error = %error,
        context = context,
        fatal = error.is_fatal(),
        "Error occurred"
    );
}

/// Generate a unique id for one invocation
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
