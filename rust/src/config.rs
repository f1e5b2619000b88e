use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Login endpoint, relative to the controller base URL.
pub const LOGON_PATH: &str = "/rest/logon";

/// Controller version endpoint.
pub const VERSION_PATH: &str = "/rest/dcnm-version";

/// Auto-config settings document.
pub const SETTINGS_PATH: &str = "/auto-config/settings";

/// Field of the version document holding the release string.
pub const VERSION_FIELD: &str = "Dcnm-Version";

/// Field of the logon response carrying the session token.
pub const TOKEN_FIELD: &str = "Dcnm-Token";

/// Token lifetime requested at login, in milliseconds.
pub const DEFAULT_EXPIRATION_TIME: u64 = 1_000_000;

/// Headers every session starts with.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json; charset=UTF-8"),
];

/// Log verbosity, named after the standard severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Error,
    #[default]
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" | "FATAL" | "ERROR" => Ok(LogLevel::Error),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" | "NOTSET" => Ok(LogLevel::Trace),
            _ => Err(Error::InvalidLogLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Connection parameters for a controller session.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Controller base URL, e.g. `https://dcnm.example.net`.
    pub url: String,
    pub user: String,
    pub passwd: String,
    /// Verbosity handed to `logging::init_logging`.
    pub logging_lvl: LogLevel,
    /// Verify the controller's TLS certificate.
    pub verify: bool,
    /// Token lifetime requested at login.
    pub expiration_time: u64,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("passwd", &"<redacted>")
            .field("logging_lvl", &self.logging_lvl)
            .field("verify", &self.verify)
            .field("expiration_time", &self.expiration_time)
            .finish()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            passwd: String::new(),
            logging_lvl: LogLevel::default(),
            verify: true,
            expiration_time: DEFAULT_EXPIRATION_TIME,
        }
    }
}

impl SessionConfig {
    pub fn new(url: impl Into<String>, user: impl Into<String>, passwd: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            passwd: passwd.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load configuration from `DCNM_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from a variable lookup. Unparseable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DCNM_URL") {
            config.url = url;
        }
        if let Some(user) = lookup("DCNM_USER") {
            config.user = user;
        }
        if let Some(passwd) = lookup("DCNM_PASSWD") {
            config.passwd = passwd;
        }
        if let Some(level) = lookup("DCNM_LOG_LEVEL").and_then(|v| v.parse().ok()) {
            config.logging_lvl = level;
        }
        if let Some(val) = lookup("DCNM_VERIFY") {
            match val.to_lowercase().as_str() {
                "true" | "1" => config.verify = true,
                "false" | "0" => config.verify = false,
                _ => {}
            }
        }
        if let Some(ms) = lookup("DCNM_EXPIRATION_TIME").and_then(|v| v.parse().ok()) {
            config.expiration_time = ms;
        }

        config
    }
}
