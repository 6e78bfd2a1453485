use crate::matcher::Algorithm;
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "fxs";
const CONFIG_FILE: &str = "config.json";

/// Overrides the app data directory (used by tests and sandboxed runs)
pub const DATA_DIR_ENV: &str = "FXS_DATA_DIR";

/// When to color terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Algorithm used when `--algorithm` is not given
    #[serde(default)]
    pub default_algorithm: Algorithm,

    /// Default color mode
    #[serde(default)]
    pub color: ColorMode,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Skip files that look binary
    #[serde(default = "default_skip_binary")]
    pub skip_binary: bool,

    /// Worker threads for directory scans. 0 means one per CPU core
    #[serde(default)]
    pub threads: usize,
}

fn default_max_file_size() -> u64 {
    64 * 1024 * 1024
}

fn default_skip_binary() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_algorithm: Algorithm::default(),
            color: ColorMode::default(),
            max_file_size: default_max_file_size(),
            skip_binary: default_skip_binary(),
            threads: 0,
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Update one setting from its command-line spelling
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default_algorithm" | "algorithm" => self.default_algorithm = value.parse()?,
            "color" => {
                self.color = ColorMode::from_str(value, true)
                    .map_err(|e| anyhow!("invalid color '{}': {}", value, e))?
            }
            "max_file_size" => {
                self.max_file_size = value
                    .parse()
                    .with_context(|| format!("invalid max_file_size '{}'", value))?
            }
            "skip_binary" => {
                self.skip_binary = value
                    .parse()
                    .with_context(|| format!("invalid skip_binary '{}'", value))?
            }
            "threads" => {
                self.threads = value
                    .parse()
                    .with_context(|| format!("invalid threads '{}'", value))?
            }
            other => bail!("unknown config key '{}'", other),
        }
        Ok(())
    }

    /// Get the effective thread count (resolves 0 to CPU count)
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus()
        } else {
            self.threads
        }
    }
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let app_dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base = if cfg!(target_os = "macos") {
                dirs::home_dir()
                    .map(|h| h.join("Library").join("Application Support"))
            } else if cfg!(target_os = "windows") {
                dirs::data_local_dir()
            } else {
                // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
                dirs::data_dir()
            };

            base.context("Could not determine app data directory")?.join(APP_NAME)
        }
    };

    fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create {}", app_dir.display()))?;
    Ok(app_dir)
}

/// Delete the config file, restoring defaults
pub fn reset_config() -> Result<()> {
    let config_path = get_config_path()?;
    if config_path.exists() {
        fs::remove_file(&config_path).context("Failed to remove config file")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.default_algorithm, Algorithm::BoyerMoore);
        assert_eq!(config.color, ColorMode::Auto);
        assert!(config.skip_binary);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_app_config_effective_threads() {
        let mut config = AppConfig::default();

        // 0 should resolve to CPU count
        assert!(config.effective_threads() >= 1);

        // Explicit value should be used as-is
        config.threads = 3;
        assert_eq!(config.effective_threads(), 3);
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig {
            default_algorithm: Algorithm::RabinKarp,
            color: ColorMode::Never,
            max_file_size: 1024,
            skip_binary: false,
            threads: 2,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.default_algorithm, Algorithm::RabinKarp);
        assert_eq!(parsed.color, ColorMode::Never);
        assert_eq!(parsed.max_file_size, 1024);
        assert!(!parsed.skip_binary);
        assert_eq!(parsed.threads, 2);
    }

    #[test]
    fn test_app_config_partial_json() {
        // Should use defaults for missing fields
        let json = r#"{"default_algorithm": "kmp"}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.default_algorithm, Algorithm::Kmp);
        assert_eq!(config.max_file_size, default_max_file_size());
        assert!(config.skip_binary);
    }

    #[test]
    fn test_app_config_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default_algorithm, Algorithm::BoyerMoore);
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn test_app_config_set() {
        let mut config = AppConfig::default();
        config.set("algorithm", "rk").unwrap();
        config.set("color", "never").unwrap();
        config.set("max_file_size", "2048").unwrap();
        config.set("skip_binary", "false").unwrap();
        config.set("threads", "8").unwrap();

        assert_eq!(config.default_algorithm, Algorithm::RabinKarp);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.max_file_size, 2048);
        assert!(!config.skip_binary);
        assert_eq!(config.threads, 8);

        assert!(config.set("threads", "many").is_err());
        assert!(config.set("colour", "never").is_err());
        assert!(config.set("color", "sometimes").is_err());
    }

    #[test]
    fn test_app_config_rejects_unknown_algorithm() {
        let json = r#"{"default_algorithm": "naive"}"#;
        assert!(serde_json::from_str::<AppConfig>(json).is_err());
    }
}
