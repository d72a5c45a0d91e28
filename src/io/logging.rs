use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "DAYPLAN_LOG";

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Append to a file (the TUI owns the terminal)
    File(PathBuf),
    Stderr,
}

pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join("dayplan.log")
}

fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Failures (already installed, unwritable
/// log file) leave logging disabled rather than aborting the program.
pub fn init(target: LogTarget, default_directive: &str) {
    let filter = build_filter(default_directive);
    let result = match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(Mutex::new(file)),
                    )
                    .try_init(),
                Err(e) => {
                    eprintln!("warning: could not open log file {}: {}", path.display(), e);
                    return;
                }
            }
        }
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("warning: logging not initialized: {}", e);
    }
}
