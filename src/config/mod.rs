use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 0 disables the per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Controller and rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    /// Abort the in-flight task of a superseded request.
    #[serde(default = "default_true")]
    pub abort_stale_requests: bool,

    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,

    #[serde(default = "default_settle_timeout_secs")]
    pub settle_timeout_secs: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://jarnox-backend-b1oe.onrender.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "stock-dashboard/0.1".to_string()
}
fn default_chart_width() -> usize {
    60
}
fn default_true() -> bool {
    true
}
fn default_placeholder_url() -> String {
    "#".to_string()
}
fn default_settle_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chart_width: default_chart_width(),
            abort_stale_requests: true,
            placeholder_url: default_placeholder_url(),
            settle_timeout_secs: default_settle_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl DashboardConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("DASH").separator("__"))
            .build()?;

        cfg.try_deserialize().context("Invalid dashboard configuration")
    }
}
