//! Logging configuration.
//!
//! Writes logs to `~/.pomodesk/pomodesk.log`. The TUI owns the terminal, so
//! nothing is written to stdout. Set `POMODESK_LOG` to an `EnvFilter`
//! directive (e.g. `pomodesk=trace`) to override the level.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Paths;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "POMODESK_LOG";

/// Initialize file logging.
///
/// Returns a `WorkerGuard` that MUST be held for the application lifetime
/// so buffered lines are flushed on exit.
///
/// # Fallback
/// If the log directory cannot be created, logs go to stderr and `None` is
/// returned.
pub fn init(paths: &Paths, verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = build_filter(verbose);

    if let Err(e) = std::fs::create_dir_all(&paths.root) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!(
            "Failed to create log directory {}: {e}, logging to stderr",
            paths.root.display()
        );
        init_stderr_only(filter);
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&paths.root, "pomodesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    // try_init: a subscriber may already be installed (tests, embedding)
    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_file = %paths.log_file.display(), verbose, "pomodesk logging initialized");
    }

    Some(guard)
}

fn build_filter(verbose: bool) -> EnvFilter {
    let default_directive = if verbose { "info,pomodesk=debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Fallback: log to stderr when the log file cannot be used.
fn init_stderr_only(filter: EnvFilter) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();

    tracing::info!("pomodesk logging initialized (stderr only)");
}
