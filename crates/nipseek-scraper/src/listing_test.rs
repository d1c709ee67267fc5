use super::*;

fn base() -> Url {
    Url::parse("https://aleo.com/pl").unwrap()
}

fn listing_page(rows: &str) -> String {
    format!(
        r#"<html><body><div data-testid="search-results">{rows}</div></body></html>"#
    )
}

fn row(name: &str, slug: &str, nip: &str) -> String {
    format!(
        r#"<div class="catalog-row-container">
             <a href="/pl/firmy/{slug}"><h3>{name}</h3></a>
             <span>NIP: {nip}</span>
             <address>ul. Prosta 1, 00-001 Warszawa</address>
           </div>"#
    )
}

#[test]
fn parses_companies_in_source_order() {
    let html = listing_page(&format!(
        "{}{}",
        row("Acme Sp. z o.o.", "acme", "123-456-32-18"),
        row("Beta SA", "beta", "5210123456"),
    ));
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert!(parsed.container_found);
    assert_eq!(parsed.skipped, 0);
    let names: Vec<&str> = parsed.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Acme Sp. z o.o.", "Beta SA"]);
}

#[test]
fn nip_is_sanitized_from_row_text() {
    let html = listing_page(&row("Acme Sp. z o.o.", "acme", "123-456-32-18"));
    let parsed = parse_listing(&html, &base(), "0000000000");
    assert_eq!(parsed.summaries[0].nip, "1234563218");
}

#[test]
fn profile_url_is_resolved_against_base() {
    let html = listing_page(&row("Acme Sp. z o.o.", "acme", "1234563218"));
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert_eq!(
        parsed.summaries[0].profile_url,
        "https://aleo.com/pl/firmy/acme"
    );
}

#[test]
fn address_fields_are_extracted() {
    let html = listing_page(&row("Acme Sp. z o.o.", "acme", "1234563218"));
    let summary = &parse_listing(&html, &base(), "1234563218").summaries[0];
    assert_eq!(
        summary.address.as_deref(),
        Some("ul. Prosta 1, 00-001 Warszawa")
    );
    assert_eq!(summary.postal_code.as_deref(), Some("00-001"));
    assert_eq!(summary.city.as_deref(), Some("Warszawa"));
}

#[test]
fn row_without_nip_inherits_query_nip() {
    let html = listing_page(
        r#"<div class="catalog-row-container">
             <a href="/pl/firmy/acme"><h3>Acme Sp. z o.o.</h3></a>
           </div>"#,
    );
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert_eq!(parsed.summaries[0].nip, "1234563218");
}

#[test]
fn row_without_name_is_skipped_and_counted() {
    let html = listing_page(&format!(
        r#"<div class="catalog-row-container">
             <a href="/pl/firmy/ghost"><h3></h3></a>
           </div>{}"#,
        row("Beta SA", "beta", "5210123456"),
    ));
    let parsed = parse_listing(&html, &base(), "5210123456");
    assert_eq!(parsed.skipped, 1);
    assert_eq!(parsed.summaries.len(), 1);
    assert_eq!(parsed.summaries[0].name, "Beta SA");
}

#[test]
fn row_without_profile_anchor_is_skipped() {
    let html = listing_page(
        r#"<div class="catalog-row-container"><h3>No Link Sp. j.</h3></div>"#,
    );
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert!(parsed.summaries.is_empty());
    assert_eq!(parsed.skipped, 1);
}

#[test]
fn duplicate_registry_ids_keep_first_occurrence() {
    let html = listing_page(&format!(
        "{}{}",
        row("Acme Sp. z o.o.", "acme", "1234563218"),
        row("Acme Duplicate", "acme-2", "1234563218"),
    ));
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert_eq!(parsed.summaries.len(), 1);
    assert_eq!(parsed.summaries[0].name, "Acme Sp. z o.o.");
}

#[test]
fn duplicate_profile_urls_are_dropped() {
    let html = listing_page(&format!(
        "{}{}",
        row("Acme Sp. z o.o.", "acme", "1234563218"),
        row("Acme Again", "acme", "9999999999"),
    ));
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert_eq!(parsed.summaries.len(), 1);
}

#[test]
fn container_present_with_zero_rows_is_empty_not_missing() {
    let html = listing_page("");
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert!(parsed.container_found);
    assert!(parsed.summaries.is_empty());
    assert_eq!(parsed.skipped, 0);
}

#[test]
fn missing_container_is_reported() {
    let html = "<html><body><div id='app'>loading...</div></body></html>";
    let parsed = parse_listing(html, &base(), "1234563218");
    assert!(!parsed.container_found);
}

#[test]
fn rows_without_container_wrapper_still_count_as_found() {
    // Markup drift on the upstream side: rows present, testid gone.
    let html = format!("<html><body>{}</body></html>", row("Acme", "acme", "1234563218"));
    let parsed = parse_listing(&html, &base(), "1234563218");
    assert!(parsed.container_found);
    assert_eq!(parsed.summaries.len(), 1);
}

#[test]
fn extract_row_nip_requires_ten_digits() {
    assert_eq!(extract_row_nip("NIP: 123-456-32-18"), Some("1234563218".to_owned()));
    assert_eq!(extract_row_nip("NIP: 12345"), None);
    assert_eq!(extract_row_nip("REGON: 123456789"), None);
}
