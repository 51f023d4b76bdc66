//! Logging capability handed to the parser and merger.

/// A sink for human-readable progress messages.
///
/// The composition root decides where messages end up; the core only ever
/// calls [`Logger::record`].
pub trait Logger: Send + Sync {
    fn record(&self, message: &str);
}

/// Forwards every message to the `log` facade at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogForwarder;

impl Logger for LogForwarder {
    fn record(&self, message: &str) {
        log::info!("{message}");
    }
}
