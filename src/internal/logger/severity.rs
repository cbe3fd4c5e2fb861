use std::fmt;
use std::str::FromStr;

use crossterm::style::{StyledContent, Stylize};
use serde::{Deserialize, Serialize};

/// Severity of a log line. Ordering is used for filtering: a line is emitted only
/// when its severity is at or above the configured minimum.
///
/// Config files, the command line and `FromStr` all accept the same names:
/// `debug`, `info`, `warn`, `warning` and `error`, in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    #[default]
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Bracketed label written into every line.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "[Debug]",
            Severity::Info => "[Info]",
            Severity::Warn => "[Warn]",
            Severity::Error => "[Error]",
        }
    }

    /// Label wrapped in its terminal colour.
    pub fn styled_label(self) -> StyledContent<&'static str> {
        let label = self.label();
        match self {
            Severity::Debug => label.green(),
            Severity::Info => label.cyan(),
            Severity::Warn => label.yellow(),
            Severity::Error => label.red(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}' (expected debug, info, warn, warning or error)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = ParseSeverityError;

    fn try_from(value: String) -> Result<Self, ParseSeverityError> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}
