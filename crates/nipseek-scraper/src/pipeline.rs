//! The lookup pipeline: validate → acquire → extract → augment → release.
//!
//! One run services one request. The browser session brackets the whole
//! run: acquired after validation succeeds, released on every exit path.
//! Listing failures abort the request (a partial listing cannot be
//! trusted); augmentation failures are isolated per company so the caller
//! still receives every record, some with empty contact fields.

use std::sync::Arc;

use serde::Serialize;

use nipseek_core::{AppConfig, CompanyRecord, Nip};

use crate::detail::{augment, DetailRetry};
use crate::error::ScrapeError;
use crate::listing::extract_listing;
use crate::query::{build_search_url, SearchFilters};
use crate::session::{ChromiumFactory, PageSession, SessionFactory};

pub use crate::detail::DetailRetry as RetryPolicy;

/// Response payload for one lookup.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub query_nip: Nip,
    pub count: usize,
    pub results: Vec<CompanyRecord>,
}

/// Orchestrates the extraction pipeline against a session factory.
pub struct Pipeline {
    factory: Arc<dyn SessionFactory>,
    base_url: String,
    nav_timeout_ms: u64,
    retry: DetailRetry,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        base_url: impl Into<String>,
        nav_timeout_ms: u64,
        retry: DetailRetry,
    ) -> Self {
        Self {
            factory,
            base_url: base_url.into(),
            nav_timeout_ms,
            retry,
        }
    }

    /// Builds a pipeline backed by per-request Chromium sessions.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(ChromiumFactory::from_config(config)),
            config.base_url.clone(),
            config.nav_timeout_ms,
            DetailRetry {
                max_retries: config.detail_max_retries,
                backoff_base_ms: config.detail_retry_backoff_ms,
            },
        )
    }

    /// Runs one lookup for a raw identifier.
    ///
    /// Validation happens before any session exists, so malformed input is
    /// rejected without touching the automation engine.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::InvalidNip`] on malformed input (no session created).
    /// - [`ScrapeError::Capacity`] when the admission limit is saturated
    ///   (no session created).
    /// - [`ScrapeError::SessionInit`] when the browser fails to start.
    /// - [`ScrapeError::ListingTimeout`] when the results page never
    ///   populates; the session is released before this returns.
    /// - [`ScrapeError::Navigation`] / [`ScrapeError::Browser`] on listing
    ///   navigation failures; the session is released before these return.
    pub async fn lookup(
        &self,
        raw_nip: &str,
        filters: &SearchFilters,
    ) -> Result<LookupResponse, ScrapeError> {
        let nip = Nip::parse(raw_nip)?;
        let address = build_search_url(&self.base_url, &nip, filters)?;

        tracing::info!(nip = %nip, address = %address, "starting lookup");
        let mut session = self.factory.acquire().await?;
        tracing::debug!(state = "session_ready", nip = %nip, "session acquired");

        let result = self.run_with_session(session.as_mut(), &nip, &address).await;

        // Unconditional release; a release failure is logged, never allowed
        // to mask the pipeline outcome.
        if let Err(release_err) = session.close().await {
            tracing::error!(error = %release_err, "failed to release browser session");
        }

        let results = result?;
        tracing::info!(nip = %nip, count = results.len(), "lookup finished");
        Ok(LookupResponse {
            count: results.len(),
            results,
            query_nip: nip,
        })
    }

    async fn run_with_session(
        &self,
        session: &mut dyn PageSession,
        nip: &Nip,
        address: &url::Url,
    ) -> Result<Vec<CompanyRecord>, ScrapeError> {
        let listing =
            extract_listing(session, address, nip.as_str(), self.nav_timeout_ms).await?;
        tracing::debug!(
            state = "listing_loaded",
            companies = listing.summaries.len(),
            skipped = listing.skipped,
            "listing extracted"
        );

        let summaries = listing.summaries;

        // Augmentation steps share the one session and therefore run
        // sequentially; listing order is preserved in the output.
        tracing::debug!(state = "augmenting", "enriching contact details");
        let mut records = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let outcome = augment(session, &summary, self.nav_timeout_ms, self.retry).await;
            records.push(CompanyRecord::merge(summary, outcome.into_contact()));
        }

        Ok(records)
    }
}

