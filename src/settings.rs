//! Settings for the application.
//!
//! Read from an optional `table-organizer.toml` (or the file given with
//! `--config`), then from `TABLE_ORGANIZER__*` environment variables, e.g.
//! `TABLE_ORGANIZER__STORAGE__PATH=/tmp/table.db`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_FILE: &str = "table-organizer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Nothing survives the process
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(default = "default_backend")]
    pub backend: Backend,
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: Storage,
    /// Tip percentage a new session starts with
    #[serde(default)]
    pub tip: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where logs go while the terminal UI owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_backend() -> Backend {
    Backend::Sqlite
}

fn default_db_path() -> PathBuf {
    PathBuf::from("table-organizer.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("table-organizer.log")
}

impl Default for Storage {
    fn default() -> Self {
        Storage {
            backend: default_backend(),
            path: default_db_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            storage: Storage::default(),
            tip: 0,
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

impl Settings {
    /// Load settings; `path` must exist when given, the default file is optional
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TABLE_ORGANIZER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
