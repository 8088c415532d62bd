use circular_watch::contract::ListingEntry;
use circular_watch::resolve::resolve_new_entries;

fn entry(id: &str, number: &str) -> ListingEntry {
    ListingEntry {
        id: id.to_string(),
        number: number.to_string(),
        issued_on: "Aug 05, 2025".to_string(),
        department: "Department of Regulation".to_string(),
        subject: format!("Subject of circular {number}"),
        detail_url: format!("https://example.org/Scripts/Display.aspx?Id={id}"),
    }
}

/// Newest-first listing as the index adapter produces it.
fn listing() -> Vec<ListingEntry> {
    vec![
        entry("104", "C/104"),
        entry("103", "C/103"),
        entry("102", "C/102"),
        entry("101", "C/101"),
    ]
}

#[test]
fn test_absent_watermark_bootstraps_with_newest_entry_only() {
    let resolved = resolve_new_entries(&listing(), None);
    assert_eq!(resolved.len(), 1, "Bootstrap must never backfill history");
    assert_eq!(resolved[0].id, "104");
}

#[test]
fn test_watermark_at_newest_resolves_nothing() {
    let resolved = resolve_new_entries(&listing(), Some("104"));
    assert!(
        resolved.is_empty(),
        "Nothing is new when the watermark matches the newest entry"
    );
}

#[test]
fn test_watermark_mid_listing_resolves_newer_entries_oldest_first() {
    let resolved = resolve_new_entries(&listing(), Some("102"));
    let ids: Vec<&str> = resolved.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["103", "104"],
        "Entries after the watermark come back oldest-first"
    );
}

#[test]
fn test_watermark_at_oldest_resolves_full_remainder() {
    let resolved = resolve_new_entries(&listing(), Some("101"));
    let ids: Vec<&str> = resolved.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["102", "103", "104"]);
}

#[test]
fn test_missing_watermark_id_falls_back_to_bootstrap() {
    // The source purged history: the stored id is nowhere in the listing.
    let resolved = resolve_new_entries(&listing(), Some("042"));
    assert_eq!(
        resolved.len(),
        1,
        "A vanished watermark must not trigger a full-listing backfill"
    );
    assert_eq!(resolved[0].id, "104");
}

#[test]
fn test_empty_listing_resolves_nothing() {
    assert!(resolve_new_entries(&[], None).is_empty());
    assert!(resolve_new_entries(&[], Some("104")).is_empty());
}

#[test]
fn test_resolver_never_emits_the_watermark_entry_itself() {
    let resolved = resolve_new_entries(&listing(), Some("103"));
    assert!(resolved.iter().all(|e| e.id != "103"));
}
