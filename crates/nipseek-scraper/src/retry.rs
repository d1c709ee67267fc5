//! Retry classification and back-off schedule for detail-view navigation.
//!
//! Only navigation-level failures are worth a second attempt; a selector
//! that matched nothing is a property of the page, not a transient fault,
//! and never reaches this module. The retry loop itself lives at the call
//! site in [`crate::detail`], which re-borrows the session between attempts.

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// Retriable: [`ScrapeError::Navigation`], [`ScrapeError::Browser`].
/// Everything else is a hard stop; in particular [`ScrapeError::ListingTimeout`]
/// already consumed a full deadline and [`ScrapeError::Capacity`] will not
/// clear within one request's lifetime.
///
/// [`ScrapeError::Navigation`]: crate::error::ScrapeError::Navigation
/// [`ScrapeError::Browser`]: crate::error::ScrapeError::Browser
/// [`ScrapeError::ListingTimeout`]: crate::error::ScrapeError::ListingTimeout
/// [`ScrapeError::Capacity`]: crate::error::ScrapeError::Capacity
pub(crate) fn is_retriable(err: &crate::error::ScrapeError) -> bool {
    use crate::error::ScrapeError;
    matches!(
        err,
        ScrapeError::Navigation { .. } | ScrapeError::Browser { .. }
    )
}

/// Sleep duration before the retry following `attempt` (0-based).
///
/// | Attempt | Sleep before next attempt |
/// |---------|---------------------------|
/// | 0       | `base_ms` × 2⁰            |
/// | 1       | `base_ms` × 2¹            |
/// | 2       | `base_ms` × 2²            |
///
/// The shift is capped and the product saturates, so extreme configs cannot
/// overflow.
pub(crate) fn backoff_delay_ms(attempt: u32, base_ms: u64) -> u64 {
    base_ms.saturating_mul(1u64 << attempt.min(10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    fn navigation_err() -> ScrapeError {
        ScrapeError::Navigation {
            url: "https://example.com/firmy/1".to_owned(),
            reason: "connection reset".to_owned(),
        }
    }

    #[test]
    fn navigation_is_retriable() {
        assert!(is_retriable(&navigation_err()));
    }

    #[test]
    fn browser_error_is_retriable() {
        assert!(is_retriable(&ScrapeError::Browser {
            reason: "target crashed".to_owned(),
        }));
    }

    #[test]
    fn listing_timeout_is_not_retriable() {
        assert!(!is_retriable(&ScrapeError::ListingTimeout {
            url: "https://example.com".to_owned(),
            timeout_ms: 1000,
        }));
    }

    #[test]
    fn capacity_is_not_retriable() {
        assert!(!is_retriable(&ScrapeError::Capacity { max_sessions: 2 }));
    }

    #[test]
    fn session_init_is_not_retriable() {
        assert!(!is_retriable(&ScrapeError::SessionInit {
            reason: "no binary".to_owned(),
        }));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay_ms(0, 500), 500);
        assert_eq!(backoff_delay_ms(1, 500), 1000);
        assert_eq!(backoff_delay_ms(2, 500), 2000);
    }

    #[test]
    fn backoff_saturates_on_extreme_configs() {
        assert_eq!(backoff_delay_ms(63, u64::MAX), u64::MAX);
        // Shift cap keeps the multiplier at 2^10 for large attempt counts.
        assert_eq!(backoff_delay_ms(40, 1), 1024);
    }
}
