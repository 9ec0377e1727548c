use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppPaths;

pub const LOG_FILE_NAME: &str = "server.log";

/// Used when `RUST_LOG` is unset. HTTP client internals stay at warn so
/// provider calls do not flood the log.
const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber: stdout plus a daily rolling `server.log`.
///
/// If the log directory cannot be created, only stdout is used.
/// A second call is a no-op.
pub fn init(paths: &AppPaths) {
    let file_writer = file_writer(&paths.log_dir);

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    let file_layer = file_writer.as_ref().map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer.clone())
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed && file_writer.is_none() {
        tracing::warn!(
            "Log directory {} is not writable; logging to stdout only",
            paths.log_dir.display()
        );
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn file_writer(log_dir: &Path) -> Option<NonBlocking> {
    std::fs::create_dir_all(log_dir).ok()?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // keep the first guard; later writers would be dropped with theirs
    if LOG_GUARD.set(guard).is_err() {
        return None;
    }
    Some(writer)
}
