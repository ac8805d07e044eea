use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_clock_interval")]
    pub clock_interval_secs: u64,
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_trend_days")]
    pub trend_days: usize,
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
    #[serde(default = "default_overlay_delay")]
    pub overlay_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_team_retry_delay")]
    pub team_retry_delay_secs: u64,
    #[serde(default = "default_overlay_delay_prediction")]
    pub overlay_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite file, or `:memory:` for an in-process store
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_base_url() -> String { "http://127.0.0.1:5000/api".to_string() }
fn default_timeout() -> u64 { 10 }
fn default_refresh_interval() -> u64 { 30 }
fn default_clock_interval() -> u64 { 1 }
fn default_trend_window() -> usize { 30 }
fn default_trend_days() -> usize { 10 }
fn default_table_rows() -> usize { 10 }
fn default_overlay_delay() -> u64 { 1500 }
fn default_history_capacity() -> usize { 10 }
fn default_team_retry_delay() -> u64 { 2 }
fn default_overlay_delay_prediction() -> u64 { 1000 }
fn default_database_path() -> String { "matchboard.db".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            clock_interval_secs: default_clock_interval(),
            trend_window: default_trend_window(),
            trend_days: default_trend_days(),
            table_rows: default_table_rows(),
            overlay_delay_ms: default_overlay_delay(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            team_retry_delay_secs: default_team_retry_delay(),
            overlay_delay_ms: default_overlay_delay_prediction(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_secs(self.clock_interval_secs)
    }

    pub fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_delay_ms)
    }
}

impl PredictionConfig {
    pub fn team_retry_delay(&self) -> Duration {
        Duration::from_secs(self.team_retry_delay_secs)
    }

    pub fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_delay_ms)
    }
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub config_path: String,
    pub api_base_url: Option<String>,
    pub database_path: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path))?;

        Ok(config)
    }

    /// Timer periods and the request timeout must be non-zero
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dashboard.refresh_interval_secs > 0,
            "dashboard.refresh_interval_secs must be at least 1"
        );
        ensure!(
            self.dashboard.clock_interval_secs > 0,
            "dashboard.clock_interval_secs must be at least 1"
        );
        ensure!(self.api.timeout_secs > 0, "api.timeout_secs must be at least 1");
        Ok(())
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Environment overrides win over the file
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.api_base_url {
            self.api.base_url = url.clone();
        }
        if let Some(path) = &env.database_path {
            self.storage.database_path = path.clone();
        }
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            config_path: std::env::var("MATCHBOARD_CONFIG")
                .unwrap_or_else(|_| "config.toml".to_string()),
            api_base_url: std::env::var("MATCHBOARD_API_URL").ok(),
            database_path: std::env::var("MATCHBOARD_DB_PATH").ok(),
        })
    }
}
