//! Content acquisition: obtain one circular's byte payload via a prioritized
//! strategy chain.
//!
//! Strategy 1 inspects the entry's detail page for a direct downloadable
//! document (anchor links, embedded viewers, then id-derived candidate URLs)
//! and verifies each candidate through the existence probe before committing
//! to a download. Strategy 2 captures the rendered detail page as a document
//! payload. First success wins; an exhausted chain is a per-entry failure the
//! pipeline records without advancing the watermark.

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::contract::{
    AcquireError, AcquiredContent, AcquisitionStrategy, ContentAcquirer, ListingEntry,
    PayloadKind, ProbePort, RenderPort,
};
use crate::listing::USER_AGENT;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Acquirer backed by HTTP transport plus the existence and rendering ports.
pub struct DocumentAcquirer {
    http: reqwest::Client,
    probe: Arc<dyn ProbePort>,
    renderer: Arc<dyn RenderPort>,
    config: SourceConfig,
}

impl DocumentAcquirer {
    pub fn new(
        config: SourceConfig,
        probe: Arc<dyn ProbePort>,
        renderer: Arc<dyn RenderPort>,
        timeout: std::time::Duration,
    ) -> Result<Self, crate::contract::PortError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| -> crate::contract::PortError {
                format!("failed to build http client: {e}").into()
            })?;
        Ok(Self {
            http,
            probe,
            renderer,
            config,
        })
    }

    async fn fetch_detail_page(&self, entry: &ListingEntry) -> Result<String, AcquireError> {
        info!(id = %entry.id, url = %entry.detail_url, "Loading circular detail page");
        let response = self
            .http
            .get(&entry.detail_url)
            .send()
            .await
            .map_err(|e| AcquireError::DetailPage(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::DetailPage(format!(
                "detail page returned status {status}"
            )));
        }
        response
            .text()
            .await
            .map_err(|e| AcquireError::DetailPage(e.to_string()))
    }

    async fn download_document(&self, url: &str) -> Result<Vec<u8>, String> {
        info!(url = %url, "Downloading document");
        let response = self
            .http
            .get(url)
            .header("Accept", "application/pdf,application/octet-stream,*/*")
            .header("Referer", &self.config.link_base)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("download returned status {status}"));
        }
        let bytes = response.bytes().await.map_err(|e| e.to_string())?.to_vec();
        if !bytes.starts_with(PDF_MAGIC) {
            return Err("downloaded payload is not a document".to_string());
        }
        debug!(url = %url, size = bytes.len(), "Downloaded document payload");
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ContentAcquirer for DocumentAcquirer {
    async fn acquire(&self, entry: &ListingEntry) -> Result<AcquiredContent, AcquireError> {
        let page = self.fetch_detail_page(entry).await?;
        let candidates = collect_candidates(&page, entry, &self.config);
        info!(
            id = %entry.id,
            candidates = candidates.len(),
            "Collected direct document candidates"
        );

        for url in &candidates {
            if !self.probe.exists(url).await {
                debug!(url = %url, "Candidate failed existence check");
                continue;
            }
            match self.download_document(url).await {
                Ok(bytes) => {
                    info!(id = %entry.id, url = %url, "Acquired via direct document link");
                    return Ok(AcquiredContent {
                        bytes,
                        kind: PayloadKind::Pdf,
                        strategy: AcquisitionStrategy::DirectDocument,
                    });
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Verified candidate failed to download");
                }
            }
        }

        // No direct document: capture the rendered page instead.
        info!(id = %entry.id, "No direct document; falling back to rendered page");
        match self.renderer.render_to_document(&entry.detail_url).await {
            Ok(bytes) => Ok(AcquiredContent {
                bytes,
                kind: PayloadKind::HtmlDerivedPdf,
                strategy: AcquisitionStrategy::RenderedPage,
            }),
            Err(e) => Err(AcquireError::Exhausted(format!(
                "{} direct candidates failed and render failed: {e}",
                candidates.len()
            ))),
        }
    }
}

/// Collect candidate document URLs from a detail page, in priority order:
/// anchor links first, then embedded viewers, then id-derived patterns.
/// Candidates matching an ignore substring are dropped; duplicates keep their
/// first position.
pub fn collect_candidates(
    page_html: &str,
    entry: &ListingEntry,
    config: &SourceConfig,
) -> Vec<String> {
    let document = Html::parse_document(page_html);
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let embed_selector = Selector::parse("object, iframe, embed").unwrap();

    let base = Url::parse(&entry.detail_url).ok();
    let mut candidates: Vec<String> = Vec::new();

    let mut push = |raw: &str| {
        let resolved = match &base {
            Some(base) => match base.join(raw) {
                Ok(url) => url.to_string(),
                Err(_) => return,
            },
            None => raw.to_string(),
        };
        let lowered = resolved.to_lowercase();
        if config
            .link_ignore
            .iter()
            .any(|noise| lowered.contains(&noise.to_lowercase()))
        {
            debug!(url = %resolved, "Skipping ignored link");
            return;
        }
        if !candidates.contains(&resolved) {
            candidates.push(resolved);
        }
    };

    for anchor in document.select(&anchor_selector) {
        if let Some(href) = anchor.value().attr("href") {
            if href.to_lowercase().ends_with(".pdf") {
                push(href);
            }
        }
    }

    for embed in document.select(&embed_selector) {
        let src = embed
            .value()
            .attr("src")
            .or_else(|| embed.value().attr("data"));
        if let Some(src) = src {
            if src.to_lowercase().contains(".pdf") {
                push(src);
            }
        }
    }

    for pattern in &config.document_url_patterns {
        push(&pattern.replace("{id}", &entry.id));
    }

    candidates
}

/// Existence probe backed by a lightweight HEAD request.
///
/// A URL exists only when it answers with a success status and a document
/// content type; transport errors count as absent so broken links fail fast.
pub struct HttpProbe {
    http: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: std::time::Duration) -> Result<Self, crate::contract::PortError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| -> crate::contract::PortError {
                format!("failed to build http client: {e}").into()
            })?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl ProbePort for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        let response = match self
            .http
            .head(url)
            .header("Accept", "application/pdf,application/octet-stream,*/*")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %url, error = %e, "Existence probe failed");
                return false;
            }
        };
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if response.status().is_success() && content_type.contains("pdf") {
            debug!(url = %url, "Valid document found");
            true
        } else {
            debug!(
                url = %url,
                status = %response.status(),
                content_type = %content_type,
                "Not a valid document"
            );
            false
        }
    }
}
