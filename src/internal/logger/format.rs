use std::fmt::{self, Display, Write as _};
use std::panic::Location;

use chrono::{DateTime, Local, TimeZone, Timelike};

use super::severity::Severity;

/// Where a line was logged from: a source location (file path or fully-qualified
/// function name) and a line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub location: &'static str,
    pub line: u32,
}

impl Caller {
    pub const fn new(location: &'static str, line: u32) -> Self {
        Self { location, line }
    }

    /// The location of the nearest caller not marked `#[track_caller]`.
    ///
    /// This reports the source *file* and line, since Rust cannot name the calling
    /// function at runtime. The `log_*!` macros record the fully-qualified function
    /// name instead.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self {
            location: location.file(),
            line: location.line(),
        }
    }
}

impl Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location, self.line)
    }
}

/// Everything needed to render one line.
pub(crate) struct Line<'a> {
    pub time: DateTime<Local>,
    pub tag: &'a str,
    pub tag_align: usize,
    pub severity: Severity,
    /// Drops the date and the caller segment.
    pub simple: bool,
    pub caller: Caller,
    pub args: &'a [&'a dyn Display],
}

impl Line<'_> {
    pub fn render(&self, color: bool) -> String {
        let mut out = String::with_capacity(64);
        out.push('[');
        write_timestamp(&mut out, &self.time, self.simple);
        out.push_str("] [");
        write_tag(&mut out, self.tag, self.tag_align);
        out.push_str("] ");
        if color {
            let _ = write!(out, "{}", self.severity.styled_label());
        } else {
            out.push_str(self.severity.label());
        }
        out.push(' ');
        if !self.simple {
            let _ = write!(out, "[{}] ", self.caller);
        }
        write_payload(&mut out, self.args);
        out
    }
}

/// `HH:MM:SS` when `simple`, else `YYYY/MM/DD HH:MM:SS.ffff` with a truncated fraction.
pub(crate) fn write_timestamp<Tz>(out: &mut String, time: &DateTime<Tz>, simple: bool)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if simple {
        let _ = write!(out, "{}", time.format("%H:%M:%S"));
    } else {
        // leap seconds report nanosecond() >= 1e9
        let fraction = (time.nanosecond() % 1_000_000_000) / 100_000;
        let _ = write!(out, "{}.{:04}", time.format("%Y/%m/%d %H:%M:%S"), fraction);
    }
}

/// Centre `tag` in `width` columns, extra padding going to the right.
pub(crate) fn write_tag(out: &mut String, tag: &str, width: usize) {
    let len = tag.chars().count();
    if width == 0 || width <= len {
        out.push_str(tag);
        return;
    }
    let pad = width - len;
    let left = pad / 2;
    let right = pad - left;
    out.extend(std::iter::repeat(' ').take(left));
    out.push_str(tag);
    out.extend(std::iter::repeat(' ').take(right));
}

pub(crate) fn write_payload(out: &mut String, args: &[&dyn Display]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
}
