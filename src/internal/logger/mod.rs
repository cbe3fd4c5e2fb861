// src/internal/logger/mod.rs

pub mod format;
pub mod layer;
pub mod logger;
pub mod severity;
pub mod sink;

use std::path::PathBuf;

pub use format::Caller;
pub use layer::{install, TaggedLayer};
pub use logger::Logger;
pub use severity::{ParseSeverityError, Severity};
pub use sink::{MemorySink, SharedSink, Sink};

// Note: the log_* macros are exported at the crate root via #[macro_export]
// and can be used as taglog::log_info!(logger, ...).

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to open log file {}: {source}", .path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}
