//! Runtime configuration sourced from the environment.
//!
//! | Variable            | Meaning                              | Default            |
//! |---------------------|--------------------------------------|--------------------|
//! | `AUTHORS_DB_PATH`   | SQLite file; unset means in-memory   | in-memory          |
//! | `AUTHORS_LOG_LEVEL` | `trace\|debug\|info\|warn\|error`    | by build mode      |
//! | `AUTHORS_LOG_DIR`   | absolute directory for rolling logs  | logging disabled   |

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "AUTHORS_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "AUTHORS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "AUTHORS_LOG_DIR";

/// Process configuration for embedding the authors core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
