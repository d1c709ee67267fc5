//! Validated NIP (Polish tax identifier) used as the lookup key.
//!
//! Input may arrive with separators (`"521-012-34-56"`, `"521 012 34 56"`);
//! everything that is not an ASCII digit is stripped before validation, the
//! same treatment the upstream catalog applies on its side. After stripping,
//! exactly 10 digits are required.
//!
//! The weighted checksum (weights 6,5,7,2,3,4,5,6,7 over the first nine
//! digits, sum mod 11 equal to the tenth) is computed but a mismatch only
//! logs a warning: registry data in the wild contains identifiers that fail
//! it, and a lookup against the catalog is harmless either way. Callers that
//! want the strict gate can check [`Nip::is_checksum_valid`].

use serde::Serialize;
use thiserror::Error;

const NIP_LEN: usize = 10;
const CHECKSUM_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NipError {
    #[error("NIP is empty after removing separators")]
    Empty,

    #[error("NIP must be exactly 10 digits, got {0}")]
    WrongLength(usize),
}

/// A validated 10-digit NIP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nip(String);

impl Nip {
    /// Parses raw user input into a validated NIP.
    ///
    /// Strips every non-digit character, then requires exactly 10 digits.
    ///
    /// # Errors
    ///
    /// - [`NipError::Empty`] if no digits remain after stripping.
    /// - [`NipError::WrongLength`] if the digit count is not 10.
    pub fn parse(raw: &str) -> Result<Self, NipError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(NipError::Empty);
        }
        if digits.len() != NIP_LEN {
            return Err(NipError::WrongLength(digits.len()));
        }

        let nip = Self(digits);
        if !nip.is_checksum_valid() {
            tracing::warn!(nip = %nip, "NIP checksum does not verify; proceeding with lookup");
        }
        Ok(nip)
    }

    /// The 10 digits, with separators removed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the weighted mod-11 checksum verifies.
    ///
    /// A sum residue of 10 is never a valid check digit, so identifiers
    /// producing it always fail.
    #[must_use]
    pub fn is_checksum_valid(&self) -> bool {
        let digits: Vec<u32> = self.0.chars().filter_map(|c| c.to_digit(10)).collect();
        debug_assert_eq!(digits.len(), NIP_LEN);

        let sum: u32 = CHECKSUM_WEIGHTS
            .iter()
            .zip(&digits)
            .map(|(w, d)| w * d)
            .sum();
        let expected = sum % 11;
        expected != 10 && expected == digits[NIP_LEN - 1]
    }
}

impl std::fmt::Display for Nip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Nip {
    type Err = NipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
