use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid NIP: {0}")]
    InvalidNip(#[from] nipseek_core::NipError),

    #[error("all {max_sessions} browser sessions are in use")]
    Capacity { max_sessions: usize },

    #[error("failed to start browser session: {reason}")]
    SessionInit { reason: String },

    #[error("invalid base URL {base_url:?}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("listing at {url} did not populate within {timeout_ms}ms")]
    ListingTimeout { url: String, timeout_ms: u64 },

    #[error("browser protocol error: {reason}")]
    Browser { reason: String },
}

impl ScrapeError {
    /// Stable machine-readable kind string, exposed over the HTTP boundary.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidNip(_) => "invalid_nip",
            Self::Capacity { .. } => "capacity_exceeded",
            Self::SessionInit { .. } => "session_init",
            Self::InvalidBaseUrl { .. } => "invalid_base_url",
            Self::Navigation { .. } => "navigation_failed",
            Self::ListingTimeout { .. } => "listing_timeout",
            Self::Browser { .. } => "browser_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        let err = ScrapeError::ListingTimeout {
            url: "https://example.com".to_owned(),
            timeout_ms: 1000,
        };
        assert_eq!(err.kind(), "listing_timeout");

        let err = ScrapeError::Capacity { max_sessions: 2 };
        assert_eq!(err.kind(), "capacity_exceeded");

        let err = ScrapeError::InvalidNip(nipseek_core::NipError::WrongLength(5));
        assert_eq!(err.kind(), "invalid_nip");
    }
}
