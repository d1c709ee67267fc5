//! Normalization of contact fields scraped from catalog pages.
//!
//! The upstream renders phone numbers with spaces and dashes, websites with
//! or without a scheme, and emails inside `mailto:` links or plain prose.
//! Everything empty after normalization collapses to `None`.

use regex::Regex;

/// Reduces a phone value to bare digits (`"+48 22 123-45-67"` → `"48221234567"`).
#[must_use]
pub fn normalize_phone(value: Option<&str>) -> Option<String> {
    let digits: String = value?.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Normalizes a website value: trims, prefixes `https://` when the scheme is
/// missing, strips the trailing slash.
#[must_use]
pub fn normalize_website(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    let scheme_re = Regex::new(r"(?i)^https?://").expect("valid scheme regex");
    let with_scheme = if scheme_re.is_match(v) {
        v.to_owned()
    } else {
        format!("https://{v}")
    };
    Some(with_scheme.trim_end_matches('/').to_owned())
}

/// Validates an email against a simple shape check; returns it trimmed.
#[must_use]
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    let email_re =
        Regex::new(r"^[\w.+-]+@[\w.-]+\.[A-Za-z]{2,}$").expect("valid email regex");
    if email_re.is_match(v) {
        Some(v.to_owned())
    } else {
        None
    }
}

/// Splits a Polish postal code and city out of a free-form address line.
///
/// Looks for `NN-NNN City` anywhere in the text, the format catalog pages
/// print addresses in.
#[must_use]
pub fn parse_postal_city(address: &str) -> Option<(String, String)> {
    let re = Regex::new(r"(\d{2}-\d{3})\s+(\p{Lu}[\p{L}\d-]*)").expect("valid postal regex");
    let caps = re.captures(address)?;
    Some((caps[1].to_owned(), caps[2].to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_keeps_digits_only() {
        assert_eq!(
            normalize_phone(Some("+48 22 123-45-67")).as_deref(),
            Some("48221234567")
        );
    }

    #[test]
    fn phone_empty_or_digitless_is_none() {
        assert_eq!(normalize_phone(Some("")), None);
        assert_eq!(normalize_phone(Some("zadzwoń")), None);
        assert_eq!(normalize_phone(None), None);
    }

    #[test]
    fn website_gets_https_prefix() {
        assert_eq!(
            normalize_website(Some("acme.pl")).as_deref(),
            Some("https://acme.pl")
        );
    }

    #[test]
    fn website_keeps_existing_scheme() {
        assert_eq!(
            normalize_website(Some("http://acme.pl/")).as_deref(),
            Some("http://acme.pl")
        );
        assert_eq!(
            normalize_website(Some("HTTPS://acme.pl")).as_deref(),
            Some("HTTPS://acme.pl")
        );
    }

    #[test]
    fn website_strips_trailing_slash() {
        assert_eq!(
            normalize_website(Some("https://acme.pl/sklep/")).as_deref(),
            Some("https://acme.pl/sklep")
        );
    }

    #[test]
    fn website_blank_is_none() {
        assert_eq!(normalize_website(Some("   ")), None);
        assert_eq!(normalize_website(None), None);
    }

    #[test]
    fn email_accepts_valid_shape() {
        assert_eq!(
            normalize_email(Some(" biuro@acme.pl ")).as_deref(),
            Some("biuro@acme.pl")
        );
    }

    #[test]
    fn email_rejects_invalid_shape() {
        assert_eq!(normalize_email(Some("not-an-email")), None);
        assert_eq!(normalize_email(Some("a@b")), None);
        assert_eq!(normalize_email(None), None);
    }

    #[test]
    fn postal_city_extracted_from_address_line() {
        let (code, city) = parse_postal_city("ul. Prosta 1, 00-001 Warszawa").unwrap();
        assert_eq!(code, "00-001");
        assert_eq!(city, "Warszawa");
    }

    #[test]
    fn postal_city_handles_diacritics() {
        let (code, city) = parse_postal_city("50-062 Wrocław, pl. Solny 14").unwrap();
        assert_eq!(code, "50-062");
        assert_eq!(city, "Wrocław");
    }

    #[test]
    fn postal_city_absent_returns_none() {
        assert!(parse_postal_city("ul. Prosta 1, Warszawa").is_none());
    }
}
