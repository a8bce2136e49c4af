use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub dexscreener: DexScreenerConfig,
    pub alerts: AlertsConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexScreenerConfig {
    /// Minimum spacing between outbound requests, shared by every endpoint
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    /// Telegram bot token from @BotFather; empty disables Telegram delivery
    #[serde(default)]
    pub telegram_bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    /// Launches older than this are pruned after every poll cycle
    pub prune_max_age_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig {
                enabled: true,
                interval_seconds: 30,
            },
            dexscreener: DexScreenerConfig {
                min_interval_ms: 500,
                max_retries: 3,
                timeout_seconds: 10,
            },
            alerts: AlertsConfig {
                enabled: true,
                interval_seconds: 60,
                telegram_bot_token: String::new(),
            },
            database: DatabaseConfig {
                path: "launchbot.db".to_string(),
                prune_max_age_hours: 48,
            },
        }
    }
}

impl Config {
    /// Load the config file, writing defaults on first run
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("launchbot-test-{}-{}.json", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_path("defaults");
        let _ = fs::remove_file(&path);

        let config = Config::load(&path).unwrap();
        assert!(Path::new(&path).exists());
        assert_eq!(config.discovery.interval_seconds, 30);
        assert_eq!(config.alerts.interval_seconds, 60);
        assert_eq!(config.database.prune_max_age_hours, 48);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let path = temp_path("garbage");
        fs::write(&path, "not json at all").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = fs::remove_file(&path);
    }
}
