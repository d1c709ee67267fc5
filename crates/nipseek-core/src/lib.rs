pub mod app_config;
pub mod company;
pub mod config;
pub mod nip;

pub use app_config::{AppConfig, Environment};
pub use company::{AugmentOutcome, CompanyContact, CompanyRecord, CompanySummary};
pub use config::{load_app_config, load_app_config_from_env};
pub use nip::{Nip, NipError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
