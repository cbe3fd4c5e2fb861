use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::internal::logger::Severity;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version information
pub fn get_version_info() -> String {
    format!("taglog version {}", VERSION)
}

/// ColorMode decides whether severity labels carry ANSI colour codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colour the console only when it is a terminal; sinks stay plain.
    #[serde(rename = "auto")]
    #[default]
    Auto,
    /// Colour the console and the sink.
    #[serde(rename = "always")]
    Always,
    #[serde(rename = "never")]
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// LockScope decides which loggers are serialized against each other while writing.
///
/// `Family` shares one lock between a root logger and everything derived from it
/// through `module`, so siblings writing to the same sink keep console and sink
/// order identical. `Instance` gives every logger its own lock: each line is still
/// written whole, but lines from two siblings may reach the console and the sink
/// in different orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LockScope {
    #[serde(rename = "family")]
    #[default]
    Family,
    #[serde(rename = "instance")]
    Instance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub level: Severity,
    #[serde(default)]
    pub simple: bool,
    #[serde(default)]
    pub tag_align: usize,
    #[serde(default)]
    pub color: ColorMode,
    #[serde(default)]
    pub lock_scope: LockScope,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_name() -> String {
    "main".to_string()
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            level: Severity::Debug,
            simple: false,
            tag_align: 0,
            color: ColorMode::Auto,
            lock_scope: LockScope::Family,
            file: None,
        }
    }
}

/// Settings shared by a logger family; a copy is taken for every emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settings {
    pub level: Severity,
    pub simple: bool,
    pub tag_align: usize,
    pub color: ColorMode,
    pub lock_scope: LockScope,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(&LoggerConfig::default())
    }
}

impl From<&LoggerConfig> for Settings {
    fn from(cfg: &LoggerConfig) -> Self {
        Self {
            level: cfg.level,
            simple: cfg.simple,
            tag_align: cfg.tag_align,
            color: cfg.color,
            lock_scope: cfg.lock_scope,
        }
    }
}
