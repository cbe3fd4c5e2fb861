// src/internal/logger/logger.rs

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Local;
use tracing::debug;

use crate::internal::config::{ColorMode, LockScope, LoggerConfig, Settings};

use super::format::{Caller, Line};
use super::severity::Severity;
use super::sink::{open_log_file, SharedSink, Sink};
use super::LoggerError;

/// Primary output of a logger family: process stdout, or a captured writer.
enum Console {
    Stdout,
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl Console {
    fn is_terminal(&self) -> bool {
        match self {
            Console::Stdout => io::stdout().is_terminal(),
            Console::Writer(_) => false,
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Console::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line)
            }
            Console::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                let mut buf = Vec::with_capacity(line.len() + 1);
                buf.extend_from_slice(line.as_bytes());
                buf.push(b'\n');
                writer.write_all(&buf)
            }
        }
    }
}

/// State shared by a root logger and every logger derived from it.
struct Family {
    settings: RwLock<Settings>,
    console: Console,
    lock: Mutex<()>,
}

/// A module-tagged logger.
///
/// `module` derives loggers that share settings, console and the current sink with
/// their parent; changing the level through any of them changes it for all.
pub struct Logger {
    name: String,
    family: Arc<Family>,
    sink: RwLock<Option<SharedSink>>,
    lock: Mutex<()>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("settings", &self.settings())
            .field("has_sink", &self.has_sink())
            .finish()
    }
}

impl Logger {
    /// Root logger named `main`, writing to stdout at `Debug` and above.
    pub fn new() -> Self {
        Self::root("main", Settings::default(), Console::Stdout)
    }

    /// Root logger whose console output goes to `writer` instead of stdout.
    pub fn with_console(writer: impl Write + Send + 'static) -> Self {
        Self::root(
            "main",
            Settings::default(),
            Console::Writer(Mutex::new(Box::new(writer))),
        )
    }

    /// Root logger built from `cfg`, opening `cfg.file` as the sink when set.
    pub fn from_config(cfg: &LoggerConfig) -> Result<Self, LoggerError> {
        let logger = Self::root(&cfg.name, Settings::from(cfg), Console::Stdout);
        if let Some(path) = &cfg.file {
            logger.set_file(path)?;
        }
        Ok(logger)
    }

    fn root(name: &str, settings: Settings, console: Console) -> Self {
        Self {
            name: name.to_string(),
            family: Arc::new(Family {
                settings: RwLock::new(settings),
                console,
                lock: Mutex::new(()),
            }),
            sink: RwLock::new(None),
            lock: Mutex::new(()),
        }
    }

    /// Derive a logger tagged `name` that shares this logger's settings, console
    /// and sink.
    pub fn module(&self, name: impl Into<String>) -> Logger {
        Logger {
            name: name.into(),
            family: Arc::clone(&self.family),
            sink: RwLock::new(self.current_sink()),
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> Settings {
        *self
            .family
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) -> &Self {
        let mut settings = self
            .family
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        apply(&mut settings);
        self
    }

    pub fn set_level(&self, level: Severity) -> &Self {
        self.update(|s| s.level = level)
    }

    /// Simple mode prints only the time of day and drops the caller segment.
    pub fn set_simple(&self, simple: bool) -> &Self {
        self.update(|s| s.simple = simple)
    }

    /// Centre module tags in `width` columns; 0 disables alignment.
    pub fn set_tag_align(&self, width: usize) -> &Self {
        self.update(|s| s.tag_align = width)
    }

    pub fn set_color(&self, color: ColorMode) -> &Self {
        self.update(|s| s.color = color)
    }

    pub fn set_lock_scope(&self, scope: LockScope) -> &Self {
        self.update(|s| s.lock_scope = scope)
    }

    pub fn level(&self) -> Severity {
        self.settings().level
    }

    pub fn is_simple(&self) -> bool {
        self.settings().simple
    }

    pub fn tag_align(&self) -> usize {
        self.settings().tag_align
    }

    pub fn color(&self) -> ColorMode {
        self.settings().color
    }

    pub fn lock_scope(&self) -> LockScope {
        self.settings().lock_scope
    }

    pub fn enabled(&self, level: Severity) -> bool {
        level >= self.settings().level
    }

    fn current_sink(&self) -> Option<SharedSink> {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn install(&self, sink: SharedSink) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    /// True while an open sink is installed; a closed sink counts as none.
    pub fn has_sink(&self) -> bool {
        self.current_sink().is_some_and(|sink| !sink.is_closed())
    }

    /// Open `path` for appending (created with mode 0755 if absent) and install it
    /// as the sink. The previous sink is replaced but not closed. On failure the
    /// current sink stays in place.
    pub fn set_file(&self, path: impl AsRef<Path>) -> Result<&Self, LoggerError> {
        let path = path.as_ref();
        let file = open_log_file(path).map_err(|source| LoggerError::SinkOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.install(SharedSink::new(file));
        debug!(target: "taglog::sink", logger = %self.name, path = %path.display(), "log file installed");
        Ok(self)
    }

    /// Install `sink` directly, replacing the previous one without closing it.
    pub fn set_writer(&self, sink: impl Sink + 'static) -> &Self {
        self.install(SharedSink::new(sink));
        self
    }

    /// Install an already shared sink, e.g. one taken from another family.
    pub fn set_shared_sink(&self, sink: SharedSink) -> &Self {
        self.install(sink);
        self
    }

    pub fn shared_sink(&self) -> Option<SharedSink> {
        self.current_sink()
    }

    /// Close the sink if one is installed. Loggers sharing it see it closed too.
    pub fn close(&self) {
        let Some(sink) = self.current_sink() else {
            return;
        };
        if let Err(err) = sink.close() {
            debug!(target: "taglog::sink", logger = %self.name, error = %err, "closing sink failed");
        }
    }

    #[track_caller]
    pub fn log(&self, level: Severity, args: &[&dyn Display]) {
        self.log_at(level, Caller::here(), args);
    }

    /// Like `log`, with the caller segment supplied explicitly.
    pub fn log_at(&self, level: Severity, caller: Caller, args: &[&dyn Display]) {
        self.emit(&self.name, level, caller, args);
    }

    #[track_caller]
    pub fn debug(&self, args: &[&dyn Display]) {
        self.log_at(Severity::Debug, Caller::here(), args);
    }

    #[track_caller]
    pub fn info(&self, args: &[&dyn Display]) {
        self.log_at(Severity::Info, Caller::here(), args);
    }

    #[track_caller]
    pub fn warn(&self, args: &[&dyn Display]) {
        self.log_at(Severity::Warn, Caller::here(), args);
    }

    #[track_caller]
    pub fn error(&self, args: &[&dyn Display]) {
        self.log_at(Severity::Error, Caller::here(), args);
    }

    fn emission_lock(&self, scope: LockScope) -> MutexGuard<'_, ()> {
        let lock = match scope {
            LockScope::Family => &self.family.lock,
            LockScope::Instance => &self.lock,
        };
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render and write one line under `tag`. Write failures are never returned.
    ///
    /// Arguments are rendered before the emission lock is taken, so a `Display`
    /// impl may itself log through any logger of the family.
    pub(crate) fn emit(&self, tag: &str, level: Severity, caller: Caller, args: &[&dyn Display]) {
        let settings = self.settings();
        if level < settings.level {
            return;
        }

        let sink = self.current_sink();
        let console_color = match settings.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => self.family.console.is_terminal(),
        };
        let sink_color = settings.color == ColorMode::Always;

        let line = Line {
            time: Local::now(),
            tag,
            tag_align: settings.tag_align,
            severity: level,
            simple: settings.simple,
            caller,
            args,
        };
        let rendered = line.render(console_color);
        let sink_rendered = match &sink {
            Some(_) if sink_color != console_color => Some(line.render(sink_color)),
            _ => None,
        };

        let sink_error = {
            let _guard = self.emission_lock(settings.lock_scope);
            let _ = self.family.console.write_line(&rendered);
            sink.and_then(|sink| {
                sink.write_line(sink_rendered.as_deref().unwrap_or(rendered.as_str()))
                    .err()
            })
        };

        if let Some(err) = sink_error {
            debug!(target: "taglog::sink", logger = %tag, error = %err, "dropped line after sink write failure");
        }
    }
}

// Convenience logging macros. They record the fully-qualified name of the
// enclosing function as the caller.

#[doc(hidden)]
#[macro_export]
macro_rules! __taglog_function {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.strip_suffix("::{{closure}}").unwrap_or(name)
    }};
}

#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_at(
            $level,
            $crate::Caller::new($crate::__taglog_function!(), ::std::line!()),
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Severity::Debug $(, $arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Severity::Info $(, $arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Severity::Warn $(, $arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Severity::Error $(, $arg)*)
    };
}
