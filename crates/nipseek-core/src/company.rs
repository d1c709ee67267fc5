//! Company records produced by the lookup pipeline.

use serde::Serialize;

/// One entry from the search-results listing, before contact enrichment.
///
/// `profile_url` is the navigable reference to the company's detail view and
/// doubles as the dedup key for listings that repeat an entry across rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanySummary {
    pub name: String,
    /// Registry identifier as printed in the listing row, digits only.
    pub nip: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Contact fields recovered from a company's detail view.
///
/// Every field is independently optional. The upstream page simply not
/// publishing a field is the normal case, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CompanyContact {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none() && self.website.is_none()
    }
}

/// Outcome of one augmentation attempt.
///
/// Failures are data, not errors: a company whose detail view never loaded
/// still produces a record, just with empty contact fields.
#[derive(Debug, Clone)]
pub enum AugmentOutcome {
    Enriched(CompanyContact),
    Failed { reason: String },
}

impl AugmentOutcome {
    /// The contact to merge into the final record. Failure collapses to an
    /// all-empty contact.
    #[must_use]
    pub fn into_contact(self) -> CompanyContact {
        match self {
            Self::Enriched(contact) => contact,
            Self::Failed { .. } => CompanyContact::default(),
        }
    }
}

/// The unit returned to the caller: summary fields plus whatever contact
/// data augmentation recovered.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyRecord {
    pub name: String,
    pub nip: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub source: &'static str,
}

impl CompanyRecord {
    /// Merges a summary with its (possibly empty) contact.
    ///
    /// Summary fields are always carried through, even when augmentation
    /// failed for this company.
    #[must_use]
    pub fn merge(summary: CompanySummary, contact: CompanyContact) -> Self {
        Self {
            name: summary.name,
            nip: summary.nip,
            profile_url: summary.profile_url,
            address: summary.address,
            city: summary.city,
            postal_code: summary.postal_code,
            phone: contact.phone,
            email: contact.email,
            website: contact.website,
            source: "aleo.com",
        }
    }
}
