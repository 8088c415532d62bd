use circular_watch::typeset::text_to_pdf;

#[test]
fn test_text_to_pdf_produces_a_document() {
    let body = "1. Has the board approved the policy?\n2. Is the review annual?";
    let bytes = text_to_pdf("Compliance Checklist - C/101", body).expect("Should typeset");
    assert!(bytes.starts_with(b"%PDF"), "Output must be a PDF document");
    assert!(bytes.len() > 100, "Content should be a non-empty PDF");
}

#[test]
fn test_long_text_paginates_without_error() {
    let line = "Does the institution maintain an auditable record of every exception raised?";
    let body = vec![line; 400].join("\n");
    let bytes = text_to_pdf("Pagination", &body).expect("Should typeset many pages");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_non_latin_text_is_replaced_not_rejected() {
    let bytes = text_to_pdf("Title", "Limit: ₹10,000 only").expect("Should typeset");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_empty_body_is_rejected() {
    assert!(text_to_pdf("Title", "   \n  ").is_err());
}
