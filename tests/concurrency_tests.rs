mod fixtures;

use std::collections::HashSet;
use std::fmt;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use fixtures::{captured_with_sink, simple_line};
use regex::Regex;
use taglog::{LockScope, Logger};

const THREADS: usize = 8;
const LINES_PER_THREAD: usize = 50;

fn payload(thread: usize, line: usize) -> String {
    format!("thread-{thread} line-{line} {}", "x".repeat(64))
}

fn hammer(loggers: Vec<Arc<Logger>>) {
    let handles: Vec<_> = loggers
        .into_iter()
        .enumerate()
        .map(|(t, logger)| {
            thread::spawn(move || {
                for i in 0..LINES_PER_THREAD {
                    logger.info(&[&payload(t, i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

/// An argument whose rendering logs through another logger of the same family.
struct LogsWhileRendering<'a> {
    logger: &'a Logger,
}

impl fmt::Display for LogsWhileRendering<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.logger.module("inner").info(&[&"rendered inside"]);
        f.write_str("outer payload")
    }
}

fn assert_all_lines_whole(lines: &[String], tags: &[String]) {
    assert_eq!(lines.len(), THREADS * LINES_PER_THREAD);
    let pattern =
        Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] \[(\w+)\] \[Info\] thread-(\d+) line-(\d+) x{64}$").unwrap();

    let mut seen = HashSet::new();
    for line in lines {
        let caps = pattern.captures(line).unwrap_or_else(|| panic!("torn line: {line:?}"));
        let t: usize = caps[2].parse().unwrap();
        assert_eq!(&caps[1], tags[t].as_str());
        assert!(seen.insert((t, caps[3].to_string())), "duplicate line {line:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_calls_on_one_instance_produce_whole_lines() {
        let (logger, console, sink) = captured_with_sink();
        let logger = Arc::new(logger);

        hammer(vec![Arc::clone(&logger); THREADS]);

        let tags = vec!["main".to_string(); THREADS];
        assert_all_lines_whole(&console.lines(), &tags);
        assert_all_lines_whole(&sink.lines(), &tags);
    }

    #[test]
    fn test_family_scope_keeps_sibling_order_identical_on_console_and_sink() {
        let (logger, console, sink) = captured_with_sink();
        assert_eq!(logger.lock_scope(), LockScope::Family);

        let tags: Vec<String> = (0..THREADS).map(|t| format!("mod{t}")).collect();
        let loggers = tags.iter().map(|tag| Arc::new(logger.module(tag.as_str()))).collect();
        hammer(loggers);

        assert_all_lines_whole(&console.lines(), &tags);
        assert_eq!(console.lines(), sink.lines());
    }

    #[test]
    fn test_instance_scope_still_writes_whole_lines() {
        let (logger, console, sink) = captured_with_sink();
        logger.set_lock_scope(LockScope::Instance);

        let tags: Vec<String> = (0..THREADS).map(|t| format!("mod{t}")).collect();
        let loggers = tags.iter().map(|tag| Arc::new(logger.module(tag.as_str()))).collect();
        hammer(loggers);

        assert_all_lines_whole(&console.lines(), &tags);
        assert_all_lines_whole(&sink.lines(), &tags);
    }

    #[test]
    fn test_display_impl_may_log_through_a_sibling() {
        for scope in [LockScope::Family, LockScope::Instance] {
            let (logger, console, sink) = captured_with_sink();
            logger.set_lock_scope(scope);
            let logger = Arc::new(logger);
            let worker = logger.module("worker");

            let (done_tx, done_rx) = mpsc::channel();
            let root = Arc::clone(&logger);
            thread::spawn(move || {
                worker.info(&[&LogsWhileRendering { logger: &root }]);
                let _ = done_tx.send(());
            });
            done_rx
                .recv_timeout(Duration::from_secs(5))
                .unwrap_or_else(|_| panic!("nested log did not finish under {scope:?}"));

            for lines in [console.lines(), sink.lines()] {
                assert_eq!(lines.len(), 2, "{scope:?}: {lines:?}");
                assert!(simple_line("inner", "[Info]", "rendered inside").is_match(&lines[0]));
                assert!(simple_line("worker", "[Info]", "outer payload").is_match(&lines[1]));
            }
        }
    }

    #[test]
    fn test_level_change_from_another_thread_is_visible() {
        let (logger, console, _sink) = captured_with_sink();
        let worker = logger.module("worker");

        thread::scope(|s| {
            s.spawn(|| {
                worker.set_level(taglog::Severity::Error);
            });
        });
        logger.warn(&[&"filtered"]);
        logger.error(&[&"kept"]);

        assert_eq!(console.lines().len(), 1);
        assert!(simple_line("main", "[Error]", "kept").is_match(&console.lines()[0]));
    }
}
