//! Runtime configuration for Foundry.
//!
//! Holds settings derived from environment variables and system defaults,
//! not from layer files. Layer files themselves live under
//! [`Config::config_dir`] and are managed by [`crate::store::ConfigStore`].

use std::path::PathBuf;

/// Environment variable overriding the configuration root.
pub const CONFIG_DIR_ENV: &str = "FOUNDRY_CONFIG_DIR";

/// Environment variable overriding the log level (read by
/// [`crate::logging::init_logging`]).
pub const LOG_LEVEL_ENV: &str = "FOUNDRY_LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding all layer files and backups (default: ~/.config/foundry)
    pub config_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration root instead of the environment/default one.
    pub fn with_config_dir(mut self, config_dir: impl Into<PathBuf>) -> Self {
        self.config_dir = config_dir.into();
        self
    }
}

fn default_config_dir() -> PathBuf {
    if let Ok(path_str) = std::env::var(CONFIG_DIR_ENV)
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    match dirs::home_dir() {
        Some(home) => home.join(".config").join("foundry"),
        None => {
            tracing::warn!(
                event = "core.config.home_dir_not_found",
                fallback = %std::env::temp_dir().display(),
                "Could not determine home directory - set HOME or FOUNDRY_CONFIG_DIR"
            );
            std::env::temp_dir().join("foundry")
        }
    }
}

/// Test utilities for tests that touch `FOUNDRY_CONFIG_DIR`.
#[doc(hidden)]
pub mod test_helpers {
    use std::sync::Mutex;

    /// Mutex to serialize tests that modify FOUNDRY_CONFIG_DIR.
    pub static CONFIG_DIR_ENV_LOCK: Mutex<()> = Mutex::new(());

    /// RAII guard that removes FOUNDRY_CONFIG_DIR on drop.
    pub struct ConfigDirEnvGuard;

    impl ConfigDirEnvGuard {
        pub fn new(path: &std::path::Path) -> Self {
            // SAFETY: Caller must hold CONFIG_DIR_ENV_LOCK to serialize access
            // from Rust test code. Only used in tests.
            unsafe { std::env::set_var(super::CONFIG_DIR_ENV, path) };
            Self
        }
    }

    impl Drop for ConfigDirEnvGuard {
        fn drop(&mut self) {
            // SAFETY: Caller holds CONFIG_DIR_ENV_LOCK for the guard lifetime.
            unsafe { std::env::remove_var(super::CONFIG_DIR_ENV) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir_env_override() {
        let _lock = CONFIG_DIR_ENV_LOCK.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let _guard = ConfigDirEnvGuard::new(temp_dir.path());

        let config = Config::new();
        assert_eq!(config.config_dir, temp_dir.path());
    }

    #[test]
    fn test_config_dir_empty_env_var_uses_default() {
        let _lock = CONFIG_DIR_ENV_LOCK.lock().unwrap();

        // SAFETY: We hold CONFIG_DIR_ENV_LOCK to serialize test access
        unsafe { std::env::set_var(CONFIG_DIR_ENV, "") };

        let config = Config::new();
        assert!(config.config_dir.ends_with("foundry"));

        // SAFETY: We hold CONFIG_DIR_ENV_LOCK to serialize test access
        unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    }

    #[test]
    fn test_with_config_dir() {
        let config = Config::new().with_config_dir("/tmp/foundry-test");
        assert_eq!(config.config_dir, PathBuf::from("/tmp/foundry-test"));
    }
}
