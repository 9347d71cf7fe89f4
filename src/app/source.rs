// DayzWatch - app/source.rs
//
// Seams to the outside world used by the cycle orchestrator.
//
// Each external collaborator is a trait with one production implementation
// in the platform layer and in-memory fakes in tests:
//   - `LogSourceConnector` / `LogSession`: scoped access to the log directory.
//     A session is released when it is dropped, on every exit path.
//   - `Summarizer`: turns the window's lines into a short report.
//   - `Notifier`: delivers the final message.

use crate::core::model::LogLocation;
use crate::util::error::{NotifyError, SourceError, SummarizeError};

/// An open connection to the log source. Dropping it closes the connection.
pub trait LogSession {
    /// File names (not paths) inside `directory`.
    fn list(&mut self, directory: &str) -> Result<Vec<String>, SourceError>;

    /// Every line of the file, newline-stripped. Undecodable bytes are
    /// replaced, never reported as an error.
    fn read_lines(&mut self, location: &LogLocation) -> Result<Vec<String>, SourceError>;
}

/// Opens one [`LogSession`] per poll tick.
pub trait LogSourceConnector {
    type Session: LogSession;

    fn connect(&self) -> Result<Self::Session, SourceError>;
}

/// Summarises the lines of one window.
pub trait Summarizer {
    fn summarize(&self, lines: &[String]) -> Result<String, SummarizeError>;
}

/// Delivers a finished message.
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}
