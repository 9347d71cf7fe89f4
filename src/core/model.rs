// DayzWatch - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

// =============================================================================
// Timestamp prefix
// =============================================================================

/// A validated `HH:MM:SS` time-of-day read from the start of a log line.
///
/// Carries no date: ADM lines only record the wall-clock time, the date is
/// implied by the file they live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampPrefix {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimestampPrefix {
    /// Build a prefix, rejecting values that are not a valid time of day.
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// The time of day with a zero sub-second component.
    pub fn to_naive_time(&self) -> NaiveTime {
        // Ranges were checked in `new`, so this cannot fail.
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for TimestampPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// =============================================================================
// Log window
// =============================================================================

/// The lines written during one whole minute `[since, until)`.
///
/// Built fresh on every poll tick and handed to the summariser unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct LogWindow<Tz: TimeZone> {
    /// Inclusive start, truncated to the minute.
    pub since: DateTime<Tz>,
    /// Exclusive end, always `since + 1 minute`.
    pub until: DateTime<Tz>,
    /// Original raw lines in file order. Never empty.
    pub lines: Vec<String>,
}

// =============================================================================
// Log location
// =============================================================================

/// One log file on the remote host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogLocation {
    /// Directory as configured (POSIX separators).
    pub directory: String,
    /// Bare file name inside `directory`.
    pub filename: String,
}

impl LogLocation {
    /// `directory/filename`, joined with `/` regardless of the local OS since
    /// SFTP paths are always POSIX.
    pub fn full_path(&self) -> String {
        if self.directory.is_empty() {
            self.filename.clone()
        } else if self.directory.ends_with('/') {
            format!("{}{}", self.directory, self.filename)
        } else {
            format!("{}/{}", self.directory, self.filename)
        }
    }
}

impl std::fmt::Display for LogLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_path())
    }
}

// =============================================================================
// Log naming convention
// =============================================================================

/// Naming convention of the rotated per-day log files:
/// `<prefix>_<YYYY-MM-DD>_<anything>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNaming {
    pub prefix: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl LogNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        Self {
            prefix: prefix.into(),
            extension,
        }
    }

    /// The prefix every file for `date` starts with, e.g. `DayZServer_2024-01-01_`.
    pub fn date_prefix(&self, date: NaiveDate) -> String {
        format!("{}_{}_", self.prefix, date.format("%Y-%m-%d"))
    }

    /// The suffix every candidate file ends with, e.g. `.ADM`.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }
}

impl Default for LogNaming {
    fn default() -> Self {
        use crate::util::constants;
        Self::new(
            constants::DEFAULT_LOG_FILE_PREFIX,
            constants::DEFAULT_LOG_FILE_EXTENSION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_prefix_rejects_out_of_range() {
        assert!(TimestampPrefix::new(23, 59, 59).is_some());
        assert!(TimestampPrefix::new(24, 0, 0).is_none());
        assert!(TimestampPrefix::new(12, 61, 0).is_none());
        assert!(TimestampPrefix::new(12, 0, 60).is_none());
    }

    #[test]
    fn test_timestamp_prefix_display_is_zero_padded() {
        let ts = TimestampPrefix::new(7, 5, 3).unwrap();
        assert_eq!(ts.to_string(), "07:05:03");
        assert_eq!(ts.to_naive_time(), NaiveTime::from_hms_opt(7, 5, 3).unwrap());
    }

    #[test]
    fn test_full_path_joins_with_forward_slash() {
        let loc = LogLocation {
            directory: "/srv/dayz/profiles".to_string(),
            filename: "DayZServer_2024-01-01_10-00-00.ADM".to_string(),
        };
        assert_eq!(
            loc.full_path(),
            "/srv/dayz/profiles/DayZServer_2024-01-01_10-00-00.ADM"
        );

        let trailing = LogLocation {
            directory: "logs/".to_string(),
            filename: "a.ADM".to_string(),
        };
        assert_eq!(trailing.full_path(), "logs/a.ADM");
    }

    #[test]
    fn test_naming_strips_leading_dot_from_extension() {
        let naming = LogNaming::new("A", ".ADM");
        assert_eq!(naming.suffix(), ".ADM");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(naming.date_prefix(date), "A_2024-01-01_");
    }
}
