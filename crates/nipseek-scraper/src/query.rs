//! Search-address construction for the upstream catalog.
//!
//! Pure functions only; no I/O. The identifier and every filter value go
//! through the `url` crate's query serializer, so embedded `&`, `=` or `#`
//! in a filter value cannot alter adjacent parameters.

use nipseek_core::Nip;
use url::Url;

use crate::error::ScrapeError;

/// Optional narrowing filters carried into the search address.
///
/// The catalog treats a NIP query as unambiguous, so filters are usually
/// empty; they exist for operators searching broader phrases through the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub voivodeship: Option<String>,
    pub city: Option<String>,
    pub registry: Option<String>,
    pub page: Option<u32>,
}

impl SearchFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voivodeship.is_none()
            && self.city.is_none()
            && self.registry.is_none()
            && self.page.is_none()
    }
}

/// Builds the search-results address for a validated NIP.
///
/// Deterministic: the same `(base_url, nip, filters)` triple always yields
/// the same address, and distinct NIPs yield distinct addresses for a fixed
/// base.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidBaseUrl`] when `base_url` does not parse as
/// an absolute URL or cannot carry path segments.
pub fn build_search_url(
    base_url: &str,
    nip: &Nip,
    filters: &SearchFilters,
) -> Result<Url, ScrapeError> {
    let mut url = Url::parse(base_url).map_err(|e| ScrapeError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|()| ScrapeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(["firms", "search"]);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", nip.as_str());
        if let Some(v) = &filters.voivodeship {
            pairs.append_pair("voivodeships", v);
        }
        if let Some(c) = &filters.city {
            pairs.append_pair("city", c);
        }
        if let Some(r) = &filters.registry {
            pairs.append_pair("registryType", r);
        }
        if let Some(p) = filters.page {
            pairs.append_pair("page", &p.to_string());
        }
    }

    Ok(url)
}
