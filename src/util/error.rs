// DayzWatch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// tick boundary can log the full chain.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all DayzWatch operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum MonitorError {
    /// Configuration loading or validation failed (fatal at startup).
    Config(ConfigError),

    /// The remote log source could not be reached, listed, or read.
    Source(SourceError),

    /// The summariser backend failed.
    Summarize(SummarizeError),

    /// The notifier backend failed.
    Notify(NotifyError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Source(e) => write!(f, "Log source error: {e}"),
            Self::Summarize(e) => write!(f, "Summariser error: {e}"),
            Self::Notify(e) => write!(f, "Notifier error: {e}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Source(e) => Some(e),
            Self::Summarize(e) => Some(e),
            Self::Notify(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// One or more required values are absent. All of them are listed so
    /// the operator can fix the environment in one go.
    MissingValues { keys: Vec<&'static str> },

    /// A value is present but cannot be used.
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },

    /// A `.env` file exists but cannot be read or parsed.
    DotEnv {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::MissingValues { keys } => {
                write!(
                    f,
                    "Missing required configuration values: {}",
                    keys.join(", ")
                )
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(f, "Config '{field}' = '{value}' is invalid. Expected: {expected}"),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
            Self::DotEnv { path, source } => {
                write!(f, "Environment file error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::DotEnv { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for MonitorError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Errors raised while talking to the log source.
#[derive(Debug)]
pub enum SourceError {
    /// TCP connection to the SSH server failed.
    Connect {
        host: String,
        port: u16,
        source: io::Error,
    },

    /// An SSH/SFTP protocol operation failed.
    Ssh {
        operation: &'static str,
        source: ssh2::Error,
    },

    /// The private key could not be used. Never carries key material.
    InvalidKey { reason: String },

    /// I/O error with path context (local source, or SFTP file reads).
    Io {
        path: String,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { host, port, source } => {
                write!(f, "Cannot connect to {host}:{port}: {source}")
            }
            Self::Ssh { operation, source } => {
                write!(f, "SSH {operation} failed: {source}")
            }
            Self::InvalidKey { reason } => write!(f, "Unusable private key: {reason}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(f, "I/O error during {operation} on '{path}': {source}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Ssh { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::InvalidKey { .. } => None,
        }
    }
}

impl From<SourceError> for MonitorError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Summarize errors
// ---------------------------------------------------------------------------

/// Errors related to the summarisation backend.
#[derive(Debug)]
pub enum SummarizeError {
    /// Transport-level failure (DNS, TLS, timeout, body decoding).
    Http { source: reqwest::Error },

    /// The API answered with a non-success status.
    Status { status: u16, body: String },

    /// The API answered successfully but without any completion choice.
    NoChoices,
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { source } => write!(f, "request failed: {source}"),
            Self::Status { status, body } => {
                write!(f, "API returned HTTP {status}: {body}")
            }
            Self::NoChoices => write!(f, "API response contained no choices"),
        }
    }
}

impl std::error::Error for SummarizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            _ => None,
        }
    }
}

impl From<SummarizeError> for MonitorError {
    fn from(e: SummarizeError) -> Self {
        Self::Summarize(e)
    }
}

// ---------------------------------------------------------------------------
// Notify errors
// ---------------------------------------------------------------------------

/// Errors related to the notification backend.
#[derive(Debug)]
pub enum NotifyError {
    /// Transport-level failure.
    Http { source: reqwest::Error },

    /// The API answered with a non-success status.
    Status { status: u16, body: String },
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { source } => write!(f, "request failed: {source}"),
            Self::Status { status, body } => {
                write!(f, "API returned HTTP {status}: {body}")
            }
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<NotifyError> for MonitorError {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

/// Convenience type alias for DayzWatch results.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_values_lists_every_key() {
        let e = ConfigError::MissingValues {
            keys: vec!["SSH_HOST", "TELEGRAM_CHAT_ID"],
        };
        assert_eq!(
            e.to_string(),
            "Missing required configuration values: SSH_HOST, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_monitor_error_preserves_source_chain() {
        let io = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err: MonitorError = SourceError::Connect {
            host: "game.example".to_string(),
            port: 22,
            source: io,
        }
        .into();

        assert!(err.to_string().starts_with("Log source error: Cannot connect"));
        let inner = err.source().expect("source error");
        let root = inner.source().expect("io error");
        assert_eq!(root.to_string(), "refused");
    }

    #[test]
    fn test_config_error_converts_into_monitor_error() {
        let err: MonitorError = ConfigError::MissingValues {
            keys: vec!["OPENROUTER_API_KEY"],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required configuration values: OPENROUTER_API_KEY"
        );
        assert!(err.source().is_some());
    }
}
