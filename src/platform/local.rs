// DayzWatch - platform/local.rs
//
// Log source over a locally reachable directory: the monitor running on the
// game host itself, or a share mounted from it.
//
// Same contract as the SFTP source: a missing logs directory is reported at
// error level and yields an empty listing, so the cycle ends with "no file"
// rather than a failure.

use crate::app::source::{LogSession, LogSourceConnector};
use crate::core::model::LogLocation;
use crate::platform::fs;
use crate::util::error::SourceError;
use std::io;
use std::path::Path;

/// Connector for a local directory. Connecting cannot fail.
#[derive(Debug, Clone, Default)]
pub struct LocalConnector;

impl LocalConnector {
    pub fn new() -> Self {
        Self
    }
}

/// A no-op "session"; kept for symmetry with the SFTP source.
#[derive(Debug)]
pub struct LocalSession;

impl LogSourceConnector for LocalConnector {
    type Session = LocalSession;

    fn connect(&self) -> Result<LocalSession, SourceError> {
        tracing::debug!("Opening local log source");
        Ok(LocalSession)
    }
}

impl LogSession for LocalSession {
    fn list(&mut self, directory: &str) -> Result<Vec<String>, SourceError> {
        let read_dir = match std::fs::read_dir(directory) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!(directory, "Logs directory not found");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(SourceError::Io {
                    path: directory.to_string(),
                    operation: "list directory",
                    source: e,
                })
            }
        };

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| SourceError::Io {
                path: directory.to_string(),
                operation: "list directory",
                source: e,
            })?;
            // `is_file` on the path follows symlinks; the entry type does not.
            let is_file = entry
                .file_type()
                .map(|t| t.is_file() || (t.is_symlink() && entry.path().is_file()))
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            // Non-UTF-8 names can never match the ASCII naming convention.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        tracing::debug!(directory, entries = names.len(), "Listed logs directory");
        Ok(names)
    }

    fn read_lines(&mut self, location: &LogLocation) -> Result<Vec<String>, SourceError> {
        let path = location.full_path();
        tracing::debug!(path = %path, "Reading log file");
        fs::read_lines_lossy(Path::new(&path)).map_err(|e| SourceError::Io {
            path,
            operation: "read",
            source: e,
        })
    }
}
