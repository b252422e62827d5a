//! Runtime configuration
//!
//! Resolves paths and the log level from command-line flags, then environment
//! variables, then platform defaults.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

use crate::logging::default_log_level;

// Environment variable names
pub const ENV_DB: &str = "NOTEBOARD_DB";
pub const ENV_LOG_DIR: &str = "NOTEBOARD_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "NOTEBOARD_LOG_LEVEL";

const APP_DIR: &str = "noteboard";
const DB_FILE: &str = "board.db";
const LOG_SUBDIR: &str = "logs";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve configuration. Flags take precedence over environment
    /// variables, which take precedence over defaults.
    pub fn resolve(db_flag: Option<PathBuf>, log_level_flag: Option<String>) -> Result<Self> {
        Self::resolve_with(db_flag, log_level_flag, |name| env::var(name).ok())
    }

    fn resolve_with<F>(
        db_flag: Option<PathBuf>,
        log_level_flag: Option<String>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = match db_flag.or_else(|| lookup(ENV_DB).map(PathBuf::from)) {
            Some(path) => path,
            None => app_dir()?.join(DB_FILE),
        };

        let log_dir = match lookup(ENV_LOG_DIR).map(PathBuf::from) {
            Some(path) => path,
            None => app_dir()?.join(LOG_SUBDIR),
        };

        let log_level = log_level_flag
            .or_else(|| lookup(ENV_LOG_LEVEL))
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

fn app_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_DIR))
}
