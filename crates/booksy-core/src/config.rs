//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/booksy/config.toml)
//! 3. Environment variables (BOOKSY_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOKSY";

/// Name of the store file inside the data directory
const BOOKS_FILE: &str = "books.json";

/// Largest export font size in points (Word caps `w:sz` at 3276 half-points)
pub const MAX_EXPORT_FONT_SIZE: u32 = 1638;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the book store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Write logs here instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Default font family for exported documents
    #[serde(default = "default_export_font")]
    pub export_font: String,

    /// Default font size (points) for exported documents
    #[serde(default = "default_export_font_size")]
    pub export_font_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: None,
            export_font: default_export_font(),
            export_font_size: default_export_font_size(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BOOKSY_DATA_DIR, BOOKSY_LOG_FILE, BOOKSY_EXPORT_FONT, ...)
    /// 2. Config file (~/.config/booksy/config.toml or BOOKSY_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
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
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_dir = PathBuf::from(val);
            }
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Ok(val) = std::env::var(format!("{}_EXPORT_FONT", ENV_PREFIX)) {
            if !val.is_empty() {
                self.export_font = val;
            }
        }

        // Unparseable or out-of-range sizes are ignored rather than failing startup
        if let Ok(val) = std::env::var(format!("{}_EXPORT_FONT_SIZE", ENV_PREFIX)) {
            if let Ok(size) = val.trim().parse::<u32>() {
                if (1..=MAX_EXPORT_FONT_SIZE).contains(&size) {
                    self.export_font_size = size;
                }
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
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
    /// Can be overridden with BOOKSY_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("booksy")
            .join("config.toml")
    }

    /// Get the path to the JSON book store
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOKS_FILE)
    }
}

/// Get the default data directory (`~/Booksy`)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Booksy")
}

fn default_export_font() -> String {
    "Georgia".to_string()
}

fn default_export_font_size() -> u32 {
    12
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
        "BOOKSY_DATA_DIR",
        "BOOKSY_LOG_FILE",
        "BOOKSY_EXPORT_FONT",
        "BOOKSY_EXPORT_FONT_SIZE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("Booksy"));
        assert!(config.log_file.is_none());
        assert_eq!(config.export_font, "Georgia");
        assert_eq!(config.export_font_size, 12);
    }

    #[test]
    fn test_books_path() {
        let config = Config::default();
        assert!(config.books_path().ends_with("books.json"));
        assert!(config.books_path().starts_with(&config.data_dir));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSY_DATA_DIR", "/tmp/booksy-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/booksy-test"));
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSY_LOG_FILE", "/tmp/booksy.log");
        config.apply_env_overrides();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/booksy.log")));

        env::set_var("BOOKSY_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_env_override_export_font() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOKSY_EXPORT_FONT", "Calibri");
        env::set_var("BOOKSY_EXPORT_FONT_SIZE", "14");
        config.apply_env_overrides();
        assert_eq!(config.export_font, "Calibri");
        assert_eq!(config.export_font_size, 14);

        env::set_var("BOOKSY_EXPORT_FONT_SIZE", "huge");
        config.apply_env_overrides();
        assert_eq!(config.export_font_size, 14);

        for out_of_range in ["0", "1639", "3000000000"] {
            env::set_var("BOOKSY_EXPORT_FONT_SIZE", out_of_range);
            config.apply_env_overrides();
            assert_eq!(config.export_font_size, 14);
        }

        env::set_var("BOOKSY_EXPORT_FONT_SIZE", "1638");
        config.apply_env_overrides();
        assert_eq!(config.export_font_size, MAX_EXPORT_FONT_SIZE);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/booksy"),
            log_file: Some(PathBuf::from("/data/booksy/debug.log")),
            export_font: "Times New Roman".to_string(),
            export_font_size: 11,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("export_font"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.export_font, "Georgia");
        assert_eq!(config.export_font_size, 12);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("BOOKSY_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.log_file.is_none());
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("books"),
            log_file: None,
            export_font: "Verdana".to_string(),
            export_font_size: 10,
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
