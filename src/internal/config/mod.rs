// src/internal/config/mod.rs

pub mod config;

pub use config::{get_version_info, ColorMode, LockScope, LoggerConfig, VERSION};
pub(crate) use config::Settings;
