// DayzWatch - platform/config.rs
//
// Configuration loading with startup validation.
//
// Sources, lowest to highest priority:
//   1. Built-in defaults (util::constants)
//   2. config.toml (explicit --config path, else the platform config
//      directory resolved with the `directories` crate; optional)
//   3. A `.env` file in the working directory (KEY=VALUE lines)
//   4. Environment variables (SSH_HOST, TELEGRAM_BOT_TOKEN, ...)
//
// Configuration is read once at startup. Missing required values, malformed
// numbers and unknown time zones are fatal: the service must not start
// polling half-configured. Out-of-range tunables fall back to their default
// with a warning.

use crate::core::filter::IgnoreRuleSet;
use crate::core::model::LogNaming;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// Secret values
// =============================================================================

/// A credential that must never reach logs. `Debug` prints a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// =============================================================================
// Raw config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub source: SourceSection,
    pub poll: PollSection,
    pub openrouter: OpenRouterSection,
    pub telegram: TelegramSection,
    pub logging: LoggingSection,
}

/// `[source]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// "sftp" (default) or "local".
    pub kind: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// PEM private key contents.
    pub private_key: Option<String>,
    /// Directory holding the rotated log files.
    pub logs_path: Option<String>,
    pub file_prefix: Option<String>,
    pub file_extension: Option<String>,
}

/// `[poll]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PollSection {
    pub interval_seconds: Option<u64>,
    /// IANA zone name, e.g. "Europe/Berlin".
    pub timezone: Option<String>,
    pub ignore_filters: Option<Vec<String>>,
}

/// `[openrouter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OpenRouterSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// `[telegram]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TelegramSection {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated settings
// =============================================================================

/// Where the log files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Sftp {
        host: String,
        port: u16,
        username: String,
        password: Option<Secret>,
        private_key: Option<Secret>,
    },
    Local,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceSettings,
    pub logs_path: String,
    pub naming: LogNaming,
    pub poll_interval: Duration,
    pub ignore: IgnoreRuleSet,
    pub timezone: chrono_tz::Tz,
    pub openrouter_api_key: Secret,
    pub openrouter_model: String,
    pub openrouter_base_url: Option<String>,
    pub telegram_bot_token: Secret,
    pub telegram_chat_id: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

// =============================================================================
// Loading
// =============================================================================

/// Default location of config.toml, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", constants::APP_ID)?;
    Some(dirs.config_dir().join(constants::CONFIG_FILE_NAME))
}

/// Load, overlay and validate the configuration.
///
/// `explicit_path` must exist when given. Without it the platform default
/// path is used if present. `env` looks up environment variables; pass
/// `|k| std::env::var(k).ok()` in production.
///
/// Returns the settings plus non-fatal warnings to log once tracing is up.
pub fn load<F>(explicit_path: Option<&Path>, env: F) -> Result<(Settings, Vec<String>), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let mut raw = match &path {
        Some(p) => read_raw(p)?,
        None => RawConfig::default(),
    };

    apply_env(&mut raw, env)?;
    validate(raw)
}

/// Read and parse a config.toml file.
pub fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_raw(&content, path)
}

/// Parse config.toml content. `path` is only used for error context.
pub fn parse_raw(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read KEY=VALUE pairs from a `.env` file without touching the process
/// environment. A missing file yields an empty map.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_err = |source| ConfigError::DotEnv {
        path: path.to_path_buf(),
        source,
    };
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(to_err(e)),
    };
    entries.collect::<Result<HashMap<_, _>, _>>().map_err(to_err)
}

/// Environment lookup where real variables win over `.env` values.
pub fn env_with_dotenv(
    dotenv: &HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + '_ {
    move |key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

/// Overlay environment variables onto `raw`. Empty values count as unset.
pub fn apply_env<F>(raw: &mut RawConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("LOG_SOURCE") {
        raw.source.kind = Some(v);
    }
    if let Some(v) = get("SSH_HOST") {
        raw.source.host = Some(v);
    }
    if let Some(v) = get("SSH_PORT") {
        raw.source.port = Some(parse_number("SSH_PORT", &v, "a TCP port (1-65535)")?);
    }
    if let Some(v) = get("SSH_USERNAME") {
        raw.source.username = Some(v);
    }
    if let Some(v) = get("SSH_PASSWORD") {
        raw.source.password = Some(v);
    }
    if let Some(v) = get("SSH_PRIVATE_KEY") {
        raw.source.private_key = Some(v);
    }
    if let Some(v) = get("DAYZ_LOGS_PATH") {
        raw.source.logs_path = Some(v);
    }
    if let Some(v) = get("POLL_INTERVAL_SECONDS") {
        raw.poll.interval_seconds = Some(parse_number(
            "POLL_INTERVAL_SECONDS",
            &v,
            "a whole number of seconds",
        )?);
    }
    if let Some(v) = get("LOG_IGNORE_FILTERS") {
        raw.poll.ignore_filters = Some(IgnoreRuleSet::from_csv(&v).patterns().to_vec());
    }
    if let Some(v) = get("DAYZ_TIMEZONE") {
        raw.poll.timezone = Some(v);
    }
    if let Some(v) = get("OPENROUTER_API_KEY") {
        raw.openrouter.api_key = Some(v);
    }
    if let Some(v) = get("OPENROUTER_MODEL") {
        raw.openrouter.model = Some(v);
    }
    if let Some(v) = get("TELEGRAM_BOT_TOKEN") {
        raw.telegram.bot_token = Some(v);
    }
    if let Some(v) = get("TELEGRAM_CHAT_ID") {
        raw.telegram.chat_id = Some(v);
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
        expected,
    })
}

/// Validate the merged configuration.
///
/// Every missing required value is collected into one error.
pub fn validate(raw: RawConfig) -> Result<(Settings, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();
    let mut missing: Vec<&'static str> = Vec::new();

    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    // -- Source --
    let kind = non_empty(raw.source.kind).map(|k| k.to_lowercase());
    let source = match kind.as_deref() {
        None | Some("sftp") => {
            let host = non_empty(raw.source.host);
            let username = non_empty(raw.source.username);
            let password = non_empty(raw.source.password).map(Secret::new);
            let private_key = non_empty(raw.source.private_key).map(Secret::new);
            if host.is_none() {
                missing.push("SSH_HOST");
            }
            if username.is_none() {
                missing.push("SSH_USERNAME");
            }
            if password.is_none() && private_key.is_none() {
                missing.push("SSH_PASSWORD or SSH_PRIVATE_KEY");
            }
            SourceSettings::Sftp {
                host: host.unwrap_or_default(),
                port: raw.source.port.unwrap_or(constants::DEFAULT_SSH_PORT),
                username: username.unwrap_or_default(),
                password,
                private_key,
            }
        }
        Some("local") => SourceSettings::Local,
        Some(other) => {
            return Err(ConfigError::InvalidValue {
                field: "LOG_SOURCE",
                value: other.to_string(),
                expected: "\"sftp\" or \"local\"",
            })
        }
    };

    if let SourceSettings::Sftp { port: 0, .. } = source {
        return Err(ConfigError::InvalidValue {
            field: "SSH_PORT",
            value: "0".to_string(),
            expected: "a TCP port (1-65535)",
        });
    }

    // -- Outbound APIs (always required) --
    let openrouter_api_key = non_empty(raw.openrouter.api_key);
    if openrouter_api_key.is_none() {
        missing.push("OPENROUTER_API_KEY");
    }
    let telegram_bot_token = non_empty(raw.telegram.bot_token);
    if telegram_bot_token.is_none() {
        missing.push("TELEGRAM_BOT_TOKEN");
    }
    let telegram_chat_id = non_empty(raw.telegram.chat_id);
    if telegram_chat_id.is_none() {
        missing.push("TELEGRAM_CHAT_ID");
    }

    if !missing.is_empty() {
        return Err(ConfigError::MissingValues { keys: missing });
    }

    // -- Time zone --
    let timezone = match non_empty(raw.poll.timezone) {
        Some(name) => name
            .trim()
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "DAYZ_TIMEZONE",
                value: name.clone(),
                expected: "an IANA time zone name such as \"Europe/Berlin\"",
            })?,
        None => chrono_tz::Tz::UTC,
    };

    // -- Poll interval --
    let mut interval_secs = constants::DEFAULT_POLL_INTERVAL_SECS;
    if let Some(secs) = raw.poll.interval_seconds {
        if (constants::MIN_POLL_INTERVAL_SECS..=constants::MAX_POLL_INTERVAL_SECS).contains(&secs) {
            interval_secs = secs;
        } else {
            warnings.push(format!(
                "[poll] interval_seconds = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_POLL_INTERVAL_SECS,
                constants::MAX_POLL_INTERVAL_SECS,
                constants::DEFAULT_POLL_INTERVAL_SECS,
            ));
        }
    }
    let window_secs = constants::WINDOW_MINUTES.unsigned_abs() * 60;
    if interval_secs > window_secs {
        warnings.push(format!(
            "Poll interval of {interval_secs}s is longer than the one-minute window; \
             some minutes will never be reported."
        ));
    } else if interval_secs < window_secs {
        warnings.push(format!(
            "Poll interval of {interval_secs}s is shorter than the one-minute window; \
             the same minute will be reported more than once."
        ));
    }

    // -- Logging: level --
    let mut log_level = None;
    if let Some(level) = non_empty(raw.logging.level) {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    let naming = LogNaming::new(
        non_empty(raw.source.file_prefix)
            .unwrap_or_else(|| constants::DEFAULT_LOG_FILE_PREFIX.to_string()),
        non_empty(raw.source.file_extension)
            .unwrap_or_else(|| constants::DEFAULT_LOG_FILE_EXTENSION.to_string()),
    );

    let settings = Settings {
        source,
        logs_path: non_empty(raw.source.logs_path)
            .unwrap_or_else(|| constants::DEFAULT_LOGS_PATH.to_string()),
        naming,
        poll_interval: Duration::from_secs(interval_secs),
        ignore: IgnoreRuleSet::new(raw.poll.ignore_filters.unwrap_or_default()),
        timezone,
        openrouter_api_key: Secret::new(openrouter_api_key.unwrap_or_default()),
        openrouter_model: non_empty(raw.openrouter.model)
            .unwrap_or_else(|| constants::DEFAULT_OPENROUTER_MODEL.to_string()),
        openrouter_base_url: non_empty(raw.openrouter.base_url),
        telegram_bot_token: Secret::new(telegram_bot_token.unwrap_or_default()),
        telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        log_level,
    };

    Ok((settings, warnings))
}
