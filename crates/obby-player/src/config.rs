//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `OBBY_REWARD_URL`, `OBBY_REWARD_AMOUNT`, `OBBY_STORE_PATH`
//! 2. Project-local: `.obby/config.toml`
//! 3. Global: `~/.obby/config.toml`

use obby_character::LocomotionConfig;
use obby_core::{ObbyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_REWARD_URL: &str = "OBBY_REWARD_URL";
pub const ENV_REWARD_AMOUNT: &str = "OBBY_REWARD_AMOUNT";
pub const ENV_STORE_PATH: &str = "OBBY_STORE_PATH";

/// Reward service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Overrides the course's per-checkpoint amount when set
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            url: None,
            amount: None,
            enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Durable store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Top-level config file structure. Every section is optional so a layer
/// only needs to mention what it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObbyConfigFile {
    #[serde(default)]
    pub reward: Option<PartialReward>,
    #[serde(default)]
    pub store: Option<StoreConfig>,
    #[serde(default)]
    pub locomotion: Option<LocomotionConfig>,
}

/// Reward section as written in one layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialReward {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct ObbyConfig {
    pub reward: RewardConfig,
    pub store: StoreConfig,
    pub locomotion: LocomotionConfig,
}

impl ObbyConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ObbyConfig::default();

        // Layer 1: Global config (~/.obby/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 2: Project-local config (.obby/config.toml)
        let local_path = PathBuf::from(".obby/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            config.merge(local);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides()?;
        config.locomotion.validate()?;
        Ok(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = ObbyConfig::default();
        config.merge(Self::load_file(path)?);
        config.apply_env_overrides()?;
        config.locomotion.validate()?;
        Ok(config)
    }

    /// Where the best-time store lives: configured path or `~/.obby/store.toml`
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".obby").join("store.toml")))
            .unwrap_or_else(|| PathBuf::from(".obby/store.toml"))
    }

    /// Rewards are sent only when enabled and a URL is configured
    pub fn reward_url(&self) -> Option<&str> {
        if self.reward.enabled {
            self.reward.url.as_deref()
        } else {
            None
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".obby").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ObbyConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: ObbyConfigFile = toml::from_str(&content).map_err(|e| {
            ObbyError::ParseError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge(&mut self, overlay: ObbyConfigFile) {
        if let Some(reward) = overlay.reward {
            if reward.url.is_some() {
                self.reward.url = reward.url;
            }
            if reward.amount.is_some() {
                self.reward.amount = reward.amount;
            }
            if let Some(enabled) = reward.enabled {
                self.reward.enabled = enabled;
            }
        }
        if let Some(store) = overlay.store {
            if store.path.is_some() {
                self.store.path = store.path;
            }
        }
        if let Some(locomotion) = overlay.locomotion {
            self.locomotion = locomotion;
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_REWARD_URL) {
            self.reward.url = Some(url);
        }
        if let Ok(amount) = std::env::var(ENV_REWARD_AMOUNT) {
            let parsed = amount.trim().parse().map_err(|_| {
                ObbyError::ParseError(format!(
                    "{} must be a whole number, got '{}'",
                    ENV_REWARD_AMOUNT, amount
                ))
            })?;
            self.reward.amount = Some(parsed);
        }
        if let Ok(path) = std::env::var(ENV_STORE_PATH) {
            self.store.path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obby_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_defaults() {
        let config = ObbyConfig::default();
        assert_eq!(config.reward.amount, None);
        assert!(config.reward.enabled);
        assert_eq!(config.reward_url(), None);
        assert!((config.locomotion.walk_speed - 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_load_config_from_file() {
        let path = temp_config(
            r#"
[reward]
url = "http://localhost:4000"
amount = 10

[store]
path = "/tmp/obby-store.toml"

[locomotion]
walk_speed = 3.0
run_speed = 6.0
"#,
        );
        let config = ObbyConfig::load_from_file(&path).unwrap();

        assert_eq!(config.reward.amount, Some(10));
        assert!(config.reward.enabled);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/obby-store.toml"));
        assert!((config.locomotion.walk_speed - 3.0).abs() < 1e-6);
        assert!((config.locomotion.turn_speed - 2.4).abs() < 1e-6);

        cleanup(&path);
    }

    #[test]
    fn test_disabled_rewards_hide_url() {
        let path = temp_config(
            r#"
[reward]
url = "http://localhost:4000"
enabled = false
"#,
        );
        let config = ObbyConfig::load_from_file(&path).unwrap();
        assert_eq!(config.reward_url(), None);
        cleanup(&path);
    }

    #[test]
    fn test_layer_merge_keeps_unset_fields() {
        let mut config = ObbyConfig::default();
        config.merge(ObbyConfigFile {
            reward: Some(PartialReward {
                url: Some("http://a".into()),
                amount: Some(7),
                enabled: None,
            }),
            ..Default::default()
        });
        config.merge(ObbyConfigFile {
            reward: Some(PartialReward {
                url: None,
                amount: None,
                enabled: Some(false),
            }),
            ..Default::default()
        });
        assert_eq!(config.reward.url.as_deref(), Some("http://a"));
        assert_eq!(config.reward.amount, Some(7));
        assert!(!config.reward.enabled);
    }

    #[test]
    fn test_invalid_locomotion_rejected() {
        let path = temp_config(
            r#"
[locomotion]
walk_speed = 5.0
run_speed = 4.0
"#,
        );
        assert!(ObbyConfig::load_from_file(&path).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_env_var_override() {
        let path = temp_config("[reward]\nurl = \"http://file\"\n");

        std::env::set_var(ENV_REWARD_URL, "http://env-override");
        let config = ObbyConfig::load_from_file(&path);
        std::env::remove_var(ENV_REWARD_URL);

        assert_eq!(config.unwrap().reward.url.as_deref(), Some("http://env-override"));
        cleanup(&path);
    }
}
