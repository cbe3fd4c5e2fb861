pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::{ColorMode, LockScope, LoggerConfig};
pub use internal::logger::{
    install, Caller, Logger, LoggerError, MemorySink, Severity, SharedSink, Sink, TaggedLayer,
};
