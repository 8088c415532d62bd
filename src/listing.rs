//! Index adapter: fetches and parses the source's tabular circular listing.
//!
//! The source publishes its circulars as an HTML table, newest-first. A row is
//! a listing row when its first cell links to the circular detail page and the
//! row carries the number/date/department/subject cells. Parsing is
//! fail-closed: a listing row that cannot be fully typed is an error, never a
//! partial record.

use scraper::{Html, Selector};
use tracing::{debug, error, info};
use url::Url;

use crate::config::SourceConfig;
use crate::contract::{IndexPort, ListingEntry, PortError};

/// Browser-like User-Agent; the source rejects obviously non-browser clients.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client for the published-circular index.
pub struct HttpListingClient {
    http: reqwest::Client,
    config: SourceConfig,
}

impl HttpListingClient {
    pub fn new(config: SourceConfig, timeout: std::time::Duration) -> Result<Self, PortError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| -> PortError { format!("failed to build http client: {e}").into() })?;
        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl IndexPort for HttpListingClient {
    async fn listing(&self) -> Result<Vec<ListingEntry>, PortError> {
        info!(url = %self.config.index_url, "Fetching circular index");
        let response = self
            .http
            .get(&self.config.index_url)
            .send()
            .await
            .map_err(|e| -> PortError { format!("index fetch failed: {e}").into() })?;
        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %self.config.index_url, "Index returned error status");
            return Err(format!("index returned status {status}").into());
        }
        let body = response
            .text()
            .await
            .map_err(|e| -> PortError { format!("index body unreadable: {e}").into() })?;

        let entries = parse_listing(&body, &self.config)?;
        info!(count = entries.len(), "Parsed circular index");
        Ok(entries)
    }
}

/// Parse the listing page into fully-typed entries, newest-first.
///
/// Rows that do not look like circular rows (header rows, navigation tables)
/// are skipped; a circular row that is missing its id is an error, and a page
/// with no circular rows at all is an error.
pub fn parse_listing(html: &str, config: &SourceConfig) -> Result<Vec<ListingEntry>, PortError> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let base = Url::parse(&config.link_base)
        .map_err(|e| -> PortError { format!("invalid link base {}: {e}", config.link_base).into() })?;

    let mut entries = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() < 4 {
            continue;
        }
        let Some(link) = cells[0].select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains(&config.detail_marker) {
            continue;
        }

        let detail_url = base
            .join(href)
            .map_err(|e| -> PortError { format!("unresolvable detail link {href}: {e}").into() })?;
        let id = detail_id(&detail_url, &config.id_param).ok_or_else(|| -> PortError {
            format!("listing row missing id parameter in {detail_url}").into()
        })?;

        let number = cell_text(&link.text().collect::<String>());
        if number.is_empty() {
            return Err(format!("listing row for id {id} has an empty circular number").into());
        }

        let entry = ListingEntry {
            id,
            number,
            issued_on: cell_text(&cells[1].text().collect::<String>()),
            department: cell_text(&cells[2].text().collect::<String>()),
            subject: cell_text(&cells[3].text().collect::<String>()),
            detail_url: detail_url.to_string(),
        };
        debug!(id = %entry.id, number = %entry.number, "Parsed listing row");
        entries.push(entry);
    }

    if entries.is_empty() {
        error!("No circular rows found in listing page");
        return Err("no circular rows found in listing page".into());
    }
    Ok(entries)
}

/// Extract the source-assigned id from a detail-page URL.
fn detail_id(url: &Url, id_param: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case(id_param))
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Collapse a cell's text nodes into one trimmed line.
fn cell_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
