//! Tracing subscriber setup
//!
//! Logs go to stderr (human readable) and to a daily rolling file under the
//! data directory. The file sink is best effort: if the directory cannot be
//! created the CLI keeps running with stderr logging only.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Prefix of the rolling log files
pub const LOG_FILE_PREFIX: &str = "metavisor-cli-log";

/// Returns the default filter directive for the given verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Builds the filter, letting `RUST_LOG` take precedence over the verbosity flag
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for the
/// lifetime of the program.
pub fn init(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
            (None, None)
        }
    };

    let result = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    guard
}
