//! Dashboard configuration
//!
//! Handles:
//! - API endpoint and poll cadence
//! - UI timing (toast duration, reset-restart delay)
//! - Connection-test simulation tuning
//! - Synthetic threat-log generation parameters
//!
//! Stored as TOML under the OS config directory; a missing file means
//! defaults (first run needs no setup).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub agents: AgentControlConfig,
    #[serde(default)]
    pub connection_test: ConnectionTestConfig,
    #[serde(default)]
    pub threat_log: ThreatLogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub toast_duration_ms: u64,
    pub event_feed_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentControlConfig {
    /// Delay before a reset agent is restarted automatically.
    pub reset_restart_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTestConfig {
    pub delay_ms: u64,
    /// Probability that the simulated connection test succeeds.
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatLogConfig {
    pub entry_count: usize,
    pub window_hours: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 3000 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 3000,
            event_feed_capacity: 10,
        }
    }
}

impl Default for AgentControlConfig {
    fn default() -> Self {
        Self {
            reset_restart_delay_ms: 3000,
        }
    }
}

impl Default for ConnectionTestConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            success_rate: 0.9,
        }
    }
}

impl Default for ThreatLogConfig {
    fn default() -> Self {
        Self {
            entry_count: 50,
            window_hours: 24,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            poll: PollConfig::default(),
            ui: UiConfig::default(),
            agents: AgentControlConfig::default(),
            connection_test: ConnectionTestConfig::default(),
            threat_log: ThreatLogConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load config from the OS-specific location, defaults if absent.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            let config: DashboardConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config, writing the defaults out on first run so the file is
    /// there to edit.
    pub async fn load_or_init() -> Result<Self> {
        let config = Self::load().await?;
        if !Self::config_file_path()?.exists() {
            config.save().await?;
        }
        Ok(config)
    }

    /// Save config to the OS-specific location.
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&config_path, content).await?;
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

        path.push("opswatch");
        path.push("config.toml");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_backend_demo() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll.interval_ms, 3000);
        assert_eq!(config.ui.event_feed_capacity, 10);
        assert_eq!(config.agents.reset_restart_delay_ms, 3000);
        assert_eq!(config.connection_test.delay_ms, 2000);
        assert!((config.connection_test.success_rate - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.threat_log.entry_count, 50);
    }

    #[test]
    fn config_file_path_is_under_opswatch() {
        let path = DashboardConfig::config_file_path().unwrap();
        assert!(path.to_string_lossy().contains("opswatch"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: DashboardConfig =
            toml::from_str("[poll]\ninterval_ms = 500\n").unwrap();
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.ui.toast_duration_ms, 3000);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    }
}
