use serde::Deserialize;

use crate::services::candidates::CandidateStrategy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (required)
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout for upstream catalog calls, in seconds
    ///
    /// The compute path chains several upstream calls, so each one carries
    /// a bound rather than waiting indefinitely.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Candidate pool strategy: catalog_native, discovery, or fixed_pool
    #[serde(default)]
    pub candidate_strategy: CandidateStrategy,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_fetch_timeout_secs() -> u64 {
    12
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
