use circular_watch::config::SourceConfig;
use circular_watch::contract::IndexPort;
use circular_watch::listing::{parse_listing, HttpListingClient};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_config(base: &str) -> SourceConfig {
    SourceConfig {
        index_url: format!("{base}/Scripts/CircularIndex.aspx"),
        link_base: format!("{base}/Scripts/"),
        detail_marker: "CircularIndexDisplay.aspx?Id=".to_string(),
        id_param: "Id".to_string(),
        document_url_patterns: vec![],
        link_ignore: vec![],
    }
}

const LISTING_PAGE: &str = r#"
<html><body>
<table><tr><td>navigation</td></tr></table>
<table>
  <tr><th>Circular Number</th><th>Date of Issue</th><th>Department</th><th>Subject</th></tr>
  <tr>
    <td><a href="CircularIndexDisplay.aspx?Id=12345">REG/2025-26/100</a></td>
    <td>Aug 05, 2025</td>
    <td>Department of Regulation</td>
    <td>Master Direction on IT Governance</td>
  </tr>
  <tr>
    <td><a href="CircularIndexDisplay.aspx?Id=12344">REG/2025-26/099</a></td>
    <td>Aug 01, 2025</td>
    <td>Department of Supervision</td>
    <td>
        Review of
        Liquidity Norms
    </td>
  </tr>
</table>
</body></html>
"#;

#[test]
fn test_parse_listing_returns_typed_entries_newest_first() {
    let config = source_config("https://example.org");
    let entries = parse_listing(LISTING_PAGE, &config).expect("Listing should parse");

    assert_eq!(entries.len(), 2);
    let newest = &entries[0];
    assert_eq!(newest.id, "12345");
    assert_eq!(newest.number, "REG/2025-26/100");
    assert_eq!(newest.issued_on, "Aug 05, 2025");
    assert_eq!(newest.department, "Department of Regulation");
    assert_eq!(newest.subject, "Master Direction on IT Governance");
    assert_eq!(
        newest.detail_url,
        "https://example.org/Scripts/CircularIndexDisplay.aspx?Id=12345"
    );

    // Cell text is collapsed to one line even when the source wraps it.
    assert_eq!(entries[1].subject, "Review of Liquidity Norms");
}

#[test]
fn test_parse_listing_fails_on_row_missing_its_id() {
    let page = r#"
<table>
  <tr>
    <td><a href="CircularIndexDisplay.aspx?Id=">REG/2025-26/100</a></td>
    <td>Aug 05, 2025</td><td>DoR</td><td>Subject</td>
  </tr>
</table>
"#;
    let config = source_config("https://example.org");
    let err = parse_listing(page, &config).expect_err("Partially-typed rows must not parse");
    assert!(
        err.to_string().contains("id"),
        "Error should name the missing id, got: {err}"
    );
}

#[test]
fn test_parse_listing_fails_when_no_circular_rows_exist() {
    let config = source_config("https://example.org");
    let err = parse_listing("<html><body><p>maintenance page</p></body></html>", &config)
        .expect_err("A page with no rows is a source failure");
    assert!(err.to_string().contains("no circular rows"));
}

#[tokio::test]
async fn test_index_client_fetches_and_parses_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Scripts/CircularIndex.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(&server)
        .await;

    let client = HttpListingClient::new(source_config(&server.uri()), Duration::from_secs(5))
        .expect("Client should build");
    let entries = client.listing().await.expect("Listing should fetch");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "12345");
    assert!(entries[0]
        .detail_url
        .starts_with(&format!("{}/Scripts/", server.uri())));
}

#[tokio::test]
async fn test_index_client_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Scripts/CircularIndex.aspx"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpListingClient::new(source_config(&server.uri()), Duration::from_secs(5))
        .expect("Client should build");
    let err = client.listing().await.expect_err("503 must fail the fetch");
    assert!(err.to_string().contains("503"));
}
