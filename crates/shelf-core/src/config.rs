//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/shelf/config.toml)
//! 3. Environment variables (SHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "SHELF";

/// Default GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4000";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// GraphQL endpoint serving the `books` query
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout for the catalog fetch, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Number of random books shown on the start screen
    #[serde(default = "default_random_picks")]
    pub random_picks: usize,

    /// Books per page when paging through the catalog
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Titles shown in the featured section
    #[serde(default)]
    pub favorite_titles: Vec<String>,

    /// Directory for log output
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log file path (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_timeout(),
            random_picks: default_random_picks(),
            page_size: default_page_size(),
            favorite_titles: Vec::new(),
            data_dir: default_data_dir(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHELF_ENDPOINT, SHELF_TIMEOUT, ...)
    /// 2. Config file (~/.config/shelf/config.toml or SHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load only what is stored on disk, without environment overrides
    ///
    /// Use this before editing and saving the file, so one-off
    /// `SHELF_*` values are never written back.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Stored configuration at the command-line path or the default path
    pub fn load_file_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::load_file(&Self::config_file_path()),
        }
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Numeric values that fail to parse are ignored.
    fn apply_env_overrides(&mut self) {
        // SHELF_ENDPOINT
        if let Ok(val) = std::env::var(format!("{}_ENDPOINT", ENV_PREFIX)) {
            if !val.is_empty() {
                self.endpoint = val;
            }
        }

        // SHELF_TIMEOUT
        if let Some(val) = env_number(&format!("{}_TIMEOUT", ENV_PREFIX)) {
            self.request_timeout_secs = val;
        }

        // SHELF_RANDOM_PICKS
        if let Some(val) = env_number(&format!("{}_RANDOM_PICKS", ENV_PREFIX)) {
            self.random_picks = val;
        }

        // SHELF_PAGE_SIZE
        if let Some(val) = env_number(&format!("{}_PAGE_SIZE", ENV_PREFIX)) {
            self.page_size = val;
        }

        // SHELF_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelf")
            .join("config.toml")
    }

    /// Get the path logs are written to
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_random_picks() -> usize {
    9
}

fn default_page_size() -> usize {
    9
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
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

    const ENV_VARS: &[&str] = &[
        "SHELF_ENDPOINT",
        "SHELF_TIMEOUT",
        "SHELF_RANDOM_PICKS",
        "SHELF_PAGE_SIZE",
        "SHELF_DATA_DIR",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:4000");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.random_picks, 9);
        assert_eq!(config.page_size, 9);
        assert!(config.favorite_titles.is_empty());
        assert!(config.data_dir.ends_with("shelf"));
    }

    #[test]
    fn test_log_path() {
        let mut config = Config::default();
        assert!(config.log_path().ends_with("debug.log"));

        config.log_file = Some(PathBuf::from("/tmp/shelf.log"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/shelf.log"));
    }

    #[test]
    fn test_env_override_endpoint() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("SHELF_ENDPOINT", "https://books.example.com/graphql");
        config.apply_env_overrides();
        assert_eq!(config.endpoint, "https://books.example.com/graphql");

        // Empty string keeps the current value
        env::set_var("SHELF_ENDPOINT", "");
        config.apply_env_overrides();
        assert_eq!(config.endpoint, "https://books.example.com/graphql");
    }

    #[test]
    fn test_env_override_numbers() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("SHELF_TIMEOUT", "3");
        env::set_var("SHELF_RANDOM_PICKS", "4");
        env::set_var("SHELF_PAGE_SIZE", " 12 ");
        config.apply_env_overrides();

        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.random_picks, 4);
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_env_override_invalid_number_ignored() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("SHELF_PAGE_SIZE", "lots");
        config.apply_env_overrides();
        assert_eq!(config.page_size, 9);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            endpoint = "http://catalog.local:4000"
            random_picks = 6
            favorite_titles = ["Cats", "Dogs"]
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.endpoint, "http://catalog.local:4000");
        assert_eq!(config.random_picks, 6);
        assert_eq!(config.page_size, 9);
        assert_eq!(config.favorite_titles, vec!["Cats", "Dogs"]);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            endpoint: "http://example.com".to_string(),
            favorite_titles: vec!["Cats".to_string()],
            log_file: Some(PathBuf::from("/var/log/shelf.log")),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "page_size = \"many\"").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_file_skips_env_overrides() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 5\n").unwrap();

        env::set_var("SHELF_ENDPOINT", "http://one-off.example:9999");
        env::set_var("SHELF_PAGE_SIZE", "20");

        let stored = Config::load_file(&path).unwrap();
        assert_eq!(stored.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(stored.page_size, 5);

        let effective = Config::load_from_path(&path).unwrap();
        assert_eq!(effective.endpoint, "http://one-off.example:9999");
        assert_eq!(effective.page_size, 20);
    }
}
