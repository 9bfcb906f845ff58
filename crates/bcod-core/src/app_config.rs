use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the B-COD client, read from `BCOD_*`
/// environment variables with production defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Base URL of the marketplace REST API.
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Page size the catalog endpoint serves; used for "no results" pages.
    pub per_page: u32,
    /// Quiet period for the search debouncer.
    pub search_debounce_ms: u64,
    pub log_level: String,
    /// Where the CLI persists the bearer token between runs.
    pub token_path: PathBuf,
}
