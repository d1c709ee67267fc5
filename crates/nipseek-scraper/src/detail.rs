//! Contact augmentation from company detail views.
//!
//! For each summary the augmenter navigates to the profile page and pulls
//! phone, email and website. Every field is independently optional; a
//! selector that matches nothing is normal page variance, not a failure.
//! A navigation or load failure for one company never crosses the
//! per-company boundary: it becomes [`AugmentOutcome::Failed`] with the
//! reason recorded, and the caller moves on.
//!
//! All structural assumptions about the detail page live in this module.

use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

use nipseek_core::{AugmentOutcome, CompanyContact, CompanySummary};

use crate::error::ScrapeError;
use crate::normalize::{normalize_email, normalize_phone, normalize_website};
use crate::retry::{backoff_delay_ms, is_retriable};
use crate::session::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The detail view is considered loaded once its main content exists.
const DETAIL_READY: &str = "main";

const WEBSITE_SELECTORS: [&str; 2] = ["[data-testid='company-website'] a", "a[href^='http']"];
const EMAIL_ANCHOR: &str = "a[href^='mailto:']";
const PHONE_SELECTOR: &str = "a[href^='tel:'], [data-testid='phone']";

/// Retry policy for detail-view navigation. Parse-level absence never
/// retries; only navigation failures do.
#[derive(Debug, Clone, Copy)]
pub struct DetailRetry {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

/// Enriches one summary with contact fields from its detail view.
///
/// Never returns an error: failures are folded into the returned
/// [`AugmentOutcome`] so one broken profile cannot abort the batch.
pub async fn augment(
    session: &mut dyn PageSession,
    summary: &CompanySummary,
    timeout_ms: u64,
    retry: DetailRetry,
) -> AugmentOutcome {
    let mut attempt = 0u32;
    let html = loop {
        match load_detail_view(session, &summary.profile_url, timeout_ms).await {
            Ok(html) => break Ok(html),
            Err(err) => {
                if !is_retriable(&err) || attempt >= retry.max_retries {
                    break Err(err);
                }
                let delay_ms = backoff_delay_ms(attempt, retry.backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries = retry.max_retries,
                    delay_ms,
                    company = %summary.name,
                    error = %err,
                    "transient detail-view failure, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    };

    match html {
        Ok(html) => AugmentOutcome::Enriched(parse_contact(&html)),
        Err(err) => {
            tracing::warn!(
                company = %summary.name,
                profile_url = %summary.profile_url,
                error = %err,
                "augmentation failed; returning record with empty contact"
            );
            AugmentOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// Navigates to the profile and waits for the main content, bounded by
/// `timeout_ms`. Returns the rendered HTML.
async fn load_detail_view(
    session: &mut dyn PageSession,
    profile_url: &str,
    timeout_ms: u64,
) -> Result<String, ScrapeError> {
    session.goto(profile_url).await?;

    let ready_sel = Selector::parse(DETAIL_READY).expect("valid ready selector");
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let html = session.content().await?;
        if Html::parse_document(&html).select(&ready_sel).next().is_some() {
            return Ok(html);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ScrapeError::Navigation {
                url: profile_url.to_owned(),
                reason: format!("detail view did not render within {timeout_ms}ms"),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Extracts contact fields from a detail-view snapshot. Pure.
#[must_use]
pub fn parse_contact(html: &str) -> CompanyContact {
    let document = Html::parse_document(html);

    CompanyContact {
        phone: normalize_phone(extract_phone(&document).as_deref()),
        email: normalize_email(extract_email(&document).as_deref()),
        website: normalize_website(extract_website(&document).as_deref()),
    }
}

fn extract_website(document: &Html) -> Option<String> {
    for sel_str in WEBSITE_SELECTORS {
        let sel = Selector::parse(sel_str).expect("valid website selector");
        if let Some(href) = document.select(&sel).find_map(|el| {
            el.value()
                .attr("href")
                .filter(|href| !href.starts_with("mailto:") && !href.starts_with("tel:"))
        }) {
            return Some(href.to_owned());
        }
    }
    // Some profiles print the site as plain text instead of a link.
    let text = page_text(document);
    let re = Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>()]+").expect("valid www regex");
    re.find(&text).map(|m| m.as_str().to_owned())
}

fn extract_email(document: &Html) -> Option<String> {
    let sel = Selector::parse(EMAIL_ANCHOR).expect("valid mailto selector");
    if let Some(href) = document.select(&sel).find_map(|el| el.value().attr("href")) {
        return Some(href.trim_start_matches("mailto:").to_owned());
    }
    // Fallback: first email-shaped token anywhere in the page text.
    let text = page_text(document);
    let re = Regex::new(r"[\w.+-]+@[\w.-]+\.[A-Za-z]{2,}").expect("valid email regex");
    re.find(&text).map(|m| m.as_str().to_owned())
}

fn extract_phone(document: &Html) -> Option<String> {
    let sel = Selector::parse(PHONE_SELECTOR).expect("valid phone selector");
    let el = document.select(&sel).next()?;
    if let Some(href) = el.value().attr("href") {
        if let Some(number) = href.strip_prefix("tel:") {
            if !number.is_empty() {
                return Some(number.to_owned());
            }
        }
    }
    let text: String = el.text().collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn page_text(document: &Html) -> String {
    document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
