//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/kamba/config.toml)
//! 3. Environment variables (KAMBA_* prefix)
//!
//! Environment variables take precedence over config file values. The
//! loaded values are passed explicitly into the API client and the push
//! listener; nothing downstream reads the environment again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "KAMBA";

/// Base URL used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the task API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Log file for the TUI (only used when KAMBA_LOG is set)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (KAMBA_API_URL)
    /// 2. Config file (~/.config/kamba/config.toml or KAMBA_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // KAMBA_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with the KAMBA_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kamba")
            .join("config.toml")
    }

    /// Path the TUI logs to when KAMBA_LOG is set
    ///
    /// Uses the configured `log_file`, falling back to a default under the
    /// local data directory.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kamba")
                .join("debug.log")
        })
    }

    /// URL of the push channel, derived from the API base URL
    ///
    /// Swaps the scheme prefix (http -> ws, https -> wss) and appends the
    /// updates path, matching the server's endpoint layout.
    pub fn updates_url(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https") {
            format!("wss{}", rest)
        } else if let Some(rest) = base.strip_prefix("http") {
            format!("ws{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/ws/updates", ws_base)
    }
}

/// Get the default API base URL
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["KAMBA_API_URL", "KAMBA_CONFIG"];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_env_override_api_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("KAMBA_API_URL", "http://tasks.example.com:9000");
        config.apply_env_overrides();

        assert_eq!(config.api_url, "http://tasks.example.com:9000");
    }

    #[test]
    fn test_updates_url_http() {
        let config = Config {
            api_url: "http://localhost:8000".to_string(),
            log_file: None,
        };
        assert_eq!(config.updates_url(), "ws://localhost:8000/ws/updates");
    }

    #[test]
    fn test_updates_url_https() {
        let config = Config {
            api_url: "https://tasks.example.com/".to_string(),
            log_file: None,
        };
        assert_eq!(config.updates_url(), "wss://tasks.example.com/ws/updates");
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            api_url = "http://10.0.0.5:8000"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            api_url: "http://192.168.1.20:8000".to_string(),
            log_file: Some(PathBuf::from("/tmp/kamba.log")),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.api_url, config.api_url);
        assert_eq!(loaded.log_file, config.log_file);
    }
}
