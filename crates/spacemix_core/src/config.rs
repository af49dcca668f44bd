//! Pipeline configuration.
//!
//! # Responsibility
//! - Describe everything a run depends on: warehouse connection, query text,
//!   chart colors and the selected project ordinal.
//! - Load it from an optional TOML file plus environment overrides.
//!
//! # Invariants
//! - Configuration is passed into the pipeline; there is no process-wide
//!   configuration state.
//! - Every field has a default, so an empty file is a valid configuration.
//! - Credentials are not validated here; a bad host, user or database surfaces
//!   as a source error when the warehouse is opened.

use crate::source::DEFAULT_SPACE_QUERY;
use crate::view::palette::ColorTable;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding [`ConnectionParams::backend`].
pub const ENV_BACKEND: &str = "SPACEMIX_BACKEND";
/// Environment variable overriding [`ConnectionParams::host`].
pub const ENV_HOST: &str = "SPACEMIX_HOST";
/// Environment variable overriding [`ConnectionParams::port`].
pub const ENV_PORT: &str = "SPACEMIX_PORT";
/// Environment variable overriding [`ConnectionParams::user`].
pub const ENV_USER: &str = "SPACEMIX_USER";
/// Environment variable overriding [`ConnectionParams::password`].
pub const ENV_PASSWORD: &str = "SPACEMIX_PASSWORD";
/// Environment variable overriding [`ConnectionParams::database`].
pub const ENV_DATABASE: &str = "SPACEMIX_DATABASE";
/// Environment variable overriding [`ConnectionParams::connect_timeout_secs`].
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "SPACEMIX_CONNECT_TIMEOUT_SECS";
/// Environment variable overriding [`ConnectionParams::busy_timeout_ms`].
pub const ENV_BUSY_TIMEOUT_MS: &str = "SPACEMIX_BUSY_TIMEOUT_MS";
/// Environment variable overriding [`PipelineConfig::selected_project`].
pub const ENV_SELECTED_PROJECT: &str = "SPACEMIX_SELECTED_PROJECT";

const DEFAULT_HOST: &str = "localhost";
/// Redshift listener port.
const DEFAULT_PORT: u16 = 5439;
const DEFAULT_DATABASE: &str = "analyticdb";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// The sixth project in first-seen order.
const DEFAULT_SELECTED_PROJECT: usize = 5;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue { key: String, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Warehouse flavor a run reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Postgres wire protocol (Redshift and Postgres warehouses).
    #[default]
    Postgres,
    /// Local SQLite extract; `database` is a file path or SQLite URI.
    Sqlite,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "redshift" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unsupported backend `{other}`")),
        }
    }
}

/// Warehouse connection parameters.
///
/// `host`, `port`, `user` and `password` only apply to [`Backend::Postgres`].
/// The password is never serialized and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionParams {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Database name, or the extract path for [`Backend::Sqlite`].
    pub database: String,
    pub connect_timeout_secs: u64,
    pub busy_timeout_ms: u64,
}

impl ConnectionParams {
    /// Describes the connection target for log lines, without credentials.
    pub fn target(&self) -> String {
        match self.backend {
            Backend::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
            Backend::Sqlite => format!("sqlite:{}", self.database),
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

/// Complete configuration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub connection: ConnectionParams,
    /// Inventory query handed to the row source.
    pub query: String,
    /// Space-type → color lookup for the chart.
    pub colors: ColorTable,
    /// Zero-based ordinal of the project to chart.
    pub selected_project: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionParams::default(),
            query: DEFAULT_SPACE_QUERY.to_string(),
            colors: ColorTable::standard(),
            selected_project: DEFAULT_SELECTED_PROJECT,
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads the optional file, then applies process environment overrides.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_BACKEND) {
            self.connection.backend = parse_value(ENV_BACKEND, &value)?;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.connection.host = host.trim().to_string();
        }
        if let Some(value) = lookup(ENV_PORT) {
            self.connection.port = parse_value(ENV_PORT, &value)?;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.connection.user = user.trim().to_string();
        }
        // Passwords may legitimately carry surrounding whitespace.
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.connection.password = password;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            self.connection.database = database.trim().to_string();
        }
        if let Some(value) = lookup(ENV_CONNECT_TIMEOUT_SECS) {
            self.connection.connect_timeout_secs = parse_value(ENV_CONNECT_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.connection.busy_timeout_ms = parse_value(ENV_BUSY_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_SELECTED_PROJECT) {
            self.selected_project = parse_value(ENV_SELECTED_PROJECT, &value)?;
        }
        Ok(self)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
