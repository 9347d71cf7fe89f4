// DayzWatch - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DayzWatch";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DayzWatch";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log file naming
// =============================================================================

/// Filename prefix of the DayZ server admin log.
pub const DEFAULT_LOG_FILE_PREFIX: &str = "DayZServer";

/// Filename extension (without the dot) of the DayZ server admin log.
pub const DEFAULT_LOG_FILE_EXTENSION: &str = "ADM";

/// Width of the extraction window in minutes.
pub const WINDOW_MINUTES: i64 = 1;

// =============================================================================
// Polling
// =============================================================================

/// Default delay between two poll ticks (seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Minimum configurable poll interval (seconds).
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Maximum configurable poll interval (seconds).
/// Anything above the window width would silently skip minutes; one hour is
/// still accepted for operators who only want occasional samples.
pub const MAX_POLL_INTERVAL_SECS: u64 = 3_600;

/// How often the cancel flag is checked within each poll sleep (ms).
pub const CANCEL_CHECK_INTERVAL_MS: u64 = 250;

// =============================================================================
// Remote source
// =============================================================================

/// Default SSH port.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default remote logs directory.
pub const DEFAULT_LOGS_PATH: &str = ".";

/// Timeout applied to the SSH session's blocking calls (ms).
pub const SSH_TIMEOUT_MS: u32 = 30_000;

// =============================================================================
// Outbound APIs
// =============================================================================

/// OpenRouter's OpenAI-compatible API root.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Model used when none is configured.
pub const DEFAULT_OPENROUTER_MODEL: &str = "openrouter/auto";

/// Timeout for a single summarisation request (seconds).
pub const OPENROUTER_TIMEOUT_SECS: u64 = 120;

/// Text substituted when the model returns no content.
pub const EMPTY_SUMMARY_PLACEHOLDER: &str = "(empty response)";

/// Telegram Bot API root.
pub const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Timeout for a single Telegram request (seconds).
pub const TELEGRAM_TIMEOUT_SECS: u64 = 15;

/// Parse mode used for outgoing notifications.
pub const TELEGRAM_PARSE_MODE: &str = "Markdown";

/// Heading placed in front of every notification.
pub const NOTIFICATION_TITLE: &str = "DayZ logs";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Optional KEY=VALUE file read from the working directory at startup.
pub const DOTENV_FILE_NAME: &str = ".env";
