//! Output destinations for rendered log lines

use std::io::{self, Write};

use super::logger::Level;

/// Receives fully rendered, single-line JSON records.
///
/// Implementations must not panic; a failed write is dropped silently.
pub trait LogSink: Send + Sync {
    fn write_line(&self, level: Level, line: &str);
}

/// Writes `error`/`warn` lines to stderr and `info`/`debug` lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdStreamSink;

impl LogSink for StdStreamSink {
    fn write_line(&self, level: Level, line: &str) {
        match level {
            Level::Error | Level::Warn => {
                let mut stderr = io::stderr().lock();
                let _ = writeln!(stderr, "{line}");
            }
            Level::Info | Level::Debug => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{line}");
            }
        }
    }
}
