//! Extraction of company summaries from the search-results listing.
//!
//! The listing is rendered client-side, so "navigation finished" says
//! nothing about whether results exist yet. [`extract_listing`] polls DOM
//! snapshots until the results container materializes or the deadline
//! expires. A container that loads with zero rows is a legitimate empty
//! result; a container that never appears is [`ScrapeError::ListingTimeout`].
//!
//! All structural assumptions about the listing page (selectors, row shape)
//! live in this module.

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use nipseek_core::CompanySummary;

use crate::error::ScrapeError;
use crate::normalize::parse_postal_city;
use crate::session::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const RESULTS_CONTAINER: &str = "[data-testid='search-results']";
const RESULT_ROW: &str = "div.catalog-row-container";
const PROFILE_ANCHOR: &str = "a[href*='/firmy/']";
const ROW_ADDRESS: &str = "[data-testid='company-address'], address, .address";

/// Result of one parse pass over a listing snapshot.
#[derive(Debug)]
pub struct ParsedListing {
    /// Whether the results container exists in the DOM at all.
    pub container_found: bool,
    /// Summaries in source order, deduplicated by registry identifier.
    pub summaries: Vec<CompanySummary>,
    /// Rows dropped for missing a required name.
    pub skipped: usize,
}

/// Navigates to the search address and extracts the listing.
///
/// Polls the rendered DOM every 250ms until the results container appears,
/// bounded by `timeout_ms`. Row count zero with a present container returns
/// an empty vec.
///
/// # Errors
///
/// - [`ScrapeError::Navigation`] if the initial page load fails.
/// - [`ScrapeError::ListingTimeout`] if the container never appears in time.
/// - [`ScrapeError::Browser`] if a DOM snapshot cannot be read.
pub async fn extract_listing(
    session: &mut dyn PageSession,
    address: &Url,
    query_nip: &str,
    timeout_ms: u64,
) -> Result<ParsedListing, ScrapeError> {
    session.goto(address.as_str()).await?;

    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let html = session.content().await?;
        let parsed = parse_listing(&html, address, query_nip);
        if parsed.container_found {
            tracing::debug!(
                companies = parsed.summaries.len(),
                skipped = parsed.skipped,
                "listing populated"
            );
            return Ok(parsed);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ScrapeError::ListingTimeout {
                url: address.to_string(),
                timeout_ms,
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Parses one DOM snapshot into company summaries. Pure.
///
/// Rows without a name are skipped and counted. Rows without their own
/// registry identifier inherit `query_nip` (the listing was keyed by it).
/// Duplicate registry identifiers keep the first occurrence only.
#[must_use]
pub fn parse_listing(html: &str, base: &Url, query_nip: &str) -> ParsedListing {
    let document = Html::parse_document(html);
    let container_sel = Selector::parse(RESULTS_CONTAINER).expect("valid container selector");
    let row_sel = Selector::parse(RESULT_ROW).expect("valid row selector");

    let rows: Vec<ElementRef<'_>> = document.select(&row_sel).collect();
    let container_found = document.select(&container_sel).next().is_some() || !rows.is_empty();

    let mut summaries = Vec::new();
    let mut skipped = 0usize;
    let mut seen_nips = std::collections::HashSet::new();
    let mut seen_profiles = std::collections::HashSet::new();

    for row in rows {
        match parse_row(row, base, query_nip) {
            Some(summary) => {
                if !seen_profiles.insert(summary.profile_url.clone()) {
                    continue;
                }
                if !seen_nips.insert(summary.nip.clone()) {
                    tracing::debug!(nip = %summary.nip, "duplicate registry id in listing, keeping first");
                    continue;
                }
                summaries.push(summary);
            }
            None => {
                skipped += 1;
                tracing::warn!(skipped, "skipping malformed listing row without a name");
            }
        }
    }

    ParsedListing {
        container_found,
        summaries,
        skipped,
    }
}

fn parse_row(row: ElementRef<'_>, base: &Url, query_nip: &str) -> Option<CompanySummary> {
    let anchor_sel = Selector::parse(PROFILE_ANCHOR).expect("valid anchor selector");
    let heading_sel = Selector::parse("h2, h3").expect("valid heading selector");
    let address_sel = Selector::parse(ROW_ADDRESS).expect("valid address selector");

    let anchor = row.select(&anchor_sel).next()?;
    let href = anchor.value().attr("href")?;
    let profile_url = base.join(href).ok()?.to_string();

    let name = anchor
        .select(&heading_sel)
        .next()
        .map_or_else(|| text_of(anchor), |h| text_of(h));
    if name.is_empty() {
        return None;
    }

    let nip = extract_row_nip(&text_of(row)).unwrap_or_else(|| query_nip.to_owned());

    let address = row
        .select(&address_sel)
        .next()
        .map(|el| text_of(el))
        .filter(|s| !s.is_empty());
    let (postal_code, city) = address
        .as_deref()
        .and_then(parse_postal_city)
        .map_or((None, None), |(code, city)| (Some(code), Some(city)));

    Some(CompanySummary {
        name,
        nip,
        profile_url,
        address,
        city,
        postal_code,
    })
}

/// Pulls a 10-digit registry identifier out of a row's text, tolerating
/// `NIP: 123-456-32-18` style separators.
fn extract_row_nip(text: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?i)NIP[:\s]*([0-9][0-9 \t-]{8,})").expect("valid nip regex");
    let raw = re.captures(text)?.get(1)?.as_str();
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        Some(digits)
    } else {
        None
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
