use std::net::SocketAddr;
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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Root of the upstream business catalog, e.g. `https://aleo.com/pl`.
    pub base_url: String,
    /// Ceiling for every navigation and wait-for-content step.
    pub nav_timeout_ms: u64,
    /// Admission limit on concurrently live browser sessions.
    pub max_concurrent_sessions: usize,
    /// Explicit chromium binary location; discovered when absent.
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
    /// Additional attempts after the first failed detail-view navigation.
    pub detail_max_retries: u32,
    pub detail_retry_backoff_ms: u64,
}
