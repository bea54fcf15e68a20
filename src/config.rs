use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::project::ProjectKeys;

const APP_NAME: &str = "godotkit";

// =============================================================================
// Feed-related constants
// =============================================================================

/// Official Godot news feed; release announcements carry the version in the title
pub const DEFAULT_FEED_URL: &str = "https://godotengine.org/rss.xml";

/// Timeout for feed fetches in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

pub const USER_AGENT: &str = concat!("godotkit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration, read from `config.json`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KitConfig {
    pub feed: FeedConfig,
    pub project: ProjectConfig,
}

/// Release feed configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedConfig {
    pub url: String,
    /// Fetch timeout in milliseconds
    pub timeout: u64,
    pub include_prerelease: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout: FETCH_TIMEOUT_MS,
            include_prerelease: false,
        }
    }
}

/// Descriptor keys the updater rewrites
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    pub keys: ProjectKeys,
}

/// Load the configuration file; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<KitConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(KitConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the path to the config directory for godotkit.
/// Uses $XDG_CONFIG_HOME/godotkit if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/godotkit,
/// or ./godotkit if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Returns the path to the data directory for godotkit.
/// Uses $XDG_DATA_HOME/godotkit if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/godotkit,
/// or ./godotkit if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("godotkit.log")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    app_dir(xdg_config_home, home_dir, ".config")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    app_dir(xdg_data_home, home_dir, ".local/share")
}

fn app_dir(xdg_dir: Option<String>, home_dir: Option<PathBuf>, home_relative: &str) -> PathBuf {
    let base = xdg_dir
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::KeyPath;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn kit_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<KitConfig>(json!({
            "feed": {
                "timeout": 1000
            }
        }))
        .unwrap();

        assert_eq!(result.feed.timeout, 1000);
        assert_eq!(result.feed.url, DEFAULT_FEED_URL);
        assert_eq!(result.project, ProjectConfig::default());
    }

    #[test]
    fn kit_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<KitConfig>(json!({
            "feed": {
                "url": "https://example.org/releases.atom",
                "timeout": 5000,
                "includePrerelease": true
            },
            "project": {
                "keys": {
                    "engineVersion": { "section": "godotkit", "key": "engine" },
                    "icon": { "section": "application", "key": "boot_splash/image" }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            KitConfig {
                feed: FeedConfig {
                    url: "https://example.org/releases.atom".to_string(),
                    timeout: 5000,
                    include_prerelease: true,
                },
                project: ProjectConfig {
                    keys: ProjectKeys {
                        engine_version: KeyPath::new("godotkit", "engine"),
                        icon: KeyPath::new("application", "boot_splash/image"),
                        ..ProjectKeys::default()
                    }
                }
            }
        );
    }

    #[test]
    fn load_config_returns_defaults_when_file_is_missing() {
        let dir = TempDir::new().unwrap();

        let result = load_config(&dir.path().join("config.json")).unwrap();

        assert_eq!(result, KitConfig::default());
    }

    #[test]
    fn load_config_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ feed: ").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/godotkit"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/godotkit"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/godotkit"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/godotkit"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./godotkit"));
    }
}
