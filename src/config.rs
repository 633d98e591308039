//! Where the department database lives.
//!
//! Resolution order, later wins: built-in default, JSON config file, `DEPART_MENTAL_DB`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "DEPART_MENTAL_CONFIG";
pub const DATABASE_ENV: &str = "DEPART_MENTAL_DB";
pub const DEFAULT_CONFIG_FILE: &str = "depart_mental.json";
pub const DEFAULT_DATABASE: &str = "depart_mental.db";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        let file = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let database = env::var_os(DATABASE_ENV).map(PathBuf::from);

        Self::resolve(file.as_deref(), database)
    }

    /// An explicitly named file must be readable.  The default file is optional.
    pub fn resolve(file: Option<&Path>, database: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        let contents = match file {
            Some(path) => Some(read_file(path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Some(read_file(path)?)
                } else {
                    None
                }
            }
        };

        if let Some(contents) = contents {
            let parsed: ConfigFile = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
            if let Some(db) = parsed.database {
                config.database = db;
            }
        }

        if let Some(db) = database {
            config.database = db;
        }

        debug!("Resolved database path {:?}", config.database);
        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_sets_database() {
        let file = config_file(r#"{ "database": "/var/lib/dept.db" }"#);
        let config = Config::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.database, PathBuf::from("/var/lib/dept.db"));
    }

    #[test]
    fn env_override_beats_file() {
        let file = config_file(r#"{ "database": "/var/lib/dept.db" }"#);
        let config = Config::resolve(Some(file.path()), Some(PathBuf::from("other.db"))).unwrap();
        assert_eq!(config.database, PathBuf::from("other.db"));
    }

    #[test]
    fn empty_object_keeps_default() {
        let file = config_file("{}");
        let config = Config::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = config_file(r#"{ "databse": "typo.db" }"#);
        let err = Config::resolve(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::resolve(Some(&dir.path().join("nope.json")), None).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
