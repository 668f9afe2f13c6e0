use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Location of the trained classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: Option<PathBuf>,

    /// Whether the rule-based scoring backend may be used
    #[serde(default = "default_heuristic_enabled")]
    pub heuristic_enabled: bool,

    /// Maximum number of analytics records kept in memory
    #[serde(default = "default_analytics_capacity")]
    pub analytics_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model_path() -> Option<PathBuf> {
    Some(PathBuf::from("models/model.json"))
}

fn default_heuristic_enabled() -> bool {
    true
}

fn default_analytics_capacity() -> usize {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            heuristic_enabled: default_heuristic_enabled(),
            analytics_capacity: default_analytics_capacity(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
