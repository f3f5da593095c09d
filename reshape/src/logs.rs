//! Diagnostic log output for the command-line tool.
//!
//! Library code logs through the `log` facade; the binary installs
//! [`StderrLogger`] so that stdout carries nothing but rendered data.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: StderrLogger = StderrLogger;

/// Writes one prefixed line per log record to stderr.
pub struct StderrLogger;

impl StderrLogger {
    /// Install the logger and set the maximum level.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_entry(record.level(), &record.args().to_string());
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "   ✗",
        Level::Warn => "   !",
        Level::Info => "   ",
        Level::Debug => "   ·",
        Level::Trace => "   ··",
    }
}

/// Render a log line; nested detail levels are indented further.
pub fn format_entry(level: Level, message: &str) -> String {
    format!("{} {}", prefix(level), message)
}
