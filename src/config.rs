// ⚙️ Configuration - where the registration log lives

use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILE: &str = "chess_registrations.txt";
pub const LOG_PATH_ENV: &str = "CHESS_REGISTRATION_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve the log target: explicit override, then environment, then default
    pub fn resolve(override_path: Option<PathBuf>) -> Self {
        Self::resolve_with(override_path, env::var_os(LOG_PATH_ENV).map(PathBuf::from))
    }

    fn resolve_with(override_path: Option<PathBuf>, from_env: Option<PathBuf>) -> Self {
        let log_path = override_path
            .or(from_env.filter(|p| !p.as_os_str().is_empty()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        Config { log_path }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}
