use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Connection settings for the external movie catalog API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Static bearer token sent on every request.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiConfig {
    /// Maximum notices visible at once; older ones are evicted first.
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u64,
    /// How often watch mode polls storage for changes made by other
    /// processes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerConfig {
    /// Playback page; the merged movie+video record is passed URL-encoded in
    /// its `data` query parameter.
    #[serde(default = "default_player_page_url")]
    pub page_url: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_max_notifications() -> usize {
    3
}

fn default_notification_timeout_ms() -> u64 {
    3000
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_player_page_url() -> String {
    "video-player.html".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_notifications: default_max_notifications(),
            notification_timeout_ms: default_notification_timeout_ms(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            page_url: default_player_page_url(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.access_token.is_empty()
            || self.catalog.access_token == "YOUR_ACCESS_TOKEN"
        {
            return Err(anyhow::anyhow!(
                "catalog.access_token is not configured; set it in config.toml"
            ));
        }
        if self.catalog.base_url.is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.ui.max_notifications == 0 {
            return Err(anyhow::anyhow!("ui.max_notifications must be at least 1"));
        }
        if self.ui.poll_interval_secs == 0 {
            return Err(anyhow::anyhow!("ui.poll_interval_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn is_catalog_configured(&self) -> bool {
        !self.catalog.access_token.is_empty()
            && self.catalog.access_token != "YOUR_ACCESS_TOKEN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            catalog: CatalogConfig {
                access_token: "test_token".to_string(),
                ..CatalogConfig::default()
            },
            ui: UiConfig::default(),
            player: PlayerConfig::default(),
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.access_token, "test_token");
        assert_eq!(loaded.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(loaded.ui.max_notifications, 3);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        assert!(!config.is_catalog_configured());

        config.catalog.access_token = "YOUR_ACCESS_TOKEN".to_string();
        assert!(config.validate().is_err());

        config.catalog.access_token = "real_token".to_string();
        assert!(config.validate().is_ok());
        assert!(config.is_catalog_configured());

        config.ui.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ui.notification_timeout_ms, 3000);
        assert_eq!(config.ui.poll_interval_secs, 2);
        assert_eq!(config.player.page_url, "video-player.html");
    }
}
