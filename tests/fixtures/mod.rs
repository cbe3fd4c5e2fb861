//! Shared helpers for logger tests
#![allow(dead_code)]

use std::io::{self, Write};

use regex::Regex;
use taglog::{ColorMode, Logger, MemorySink, Sink};

/// Logger whose console output is captured, with colours off.
pub fn captured() -> (Logger, MemorySink) {
    let console = MemorySink::new();
    let logger = Logger::with_console(console.clone());
    logger.set_color(ColorMode::Never);
    (logger, console)
}

/// Captured logger in simple mode with an in-memory sink installed.
pub fn captured_with_sink() -> (Logger, MemorySink, MemorySink) {
    let (logger, console) = captured();
    let sink = MemorySink::new();
    logger.set_simple(true).set_writer(sink.clone());
    (logger, console, sink)
}

pub fn simple_line(tag: &str, label: &str, payload: &str) -> Regex {
    Regex::new(&format!(
        r"^\[\d{{2}}:\d{{2}}:\d{{2}}\] \[{}\] {} {}$",
        regex::escape(tag),
        regex::escape(label),
        regex::escape(payload)
    ))
    .unwrap()
}

/// A sink whose every write fails.
pub struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for BrokenSink {}
