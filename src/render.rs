//! Rendering adapter: captures a detail page, post client-side rendering, as a
//! document payload via headless Chromium.
//!
//! The browser session is scoped to a single render call and torn down on
//! every exit path, including errors and timeouts; a watch run never leaves a
//! browser process behind.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::contract::{PortError, RenderPort};

/// Locate a Chromium binary: env override first, then the system PATH.
pub fn find_browser() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("CIRCULAR_WATCH_CHROMIUM") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}

/// Renderer that launches a headless Chromium per call and prints the loaded
/// page to PDF.
pub struct ChromiumRenderer {
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait]
impl RenderPort for ChromiumRenderer {
    async fn render_to_document(&self, url: &str) -> Result<Vec<u8>, PortError> {
        info!(url = %url, "Rendering page to document");
        match tokio::time::timeout(self.timeout, render_once(url)).await {
            Ok(result) => result,
            Err(_) => Err(format!("render timed out after {:?}", self.timeout).into()),
        }
    }
}

async fn render_once(url: &str) -> Result<Vec<u8>, PortError> {
    let executable = find_browser()
        .ok_or_else(|| -> PortError { "no chromium binary found for rendering".into() })?;
    debug!(executable = %executable.display(), "Launching headless browser");

    let config = BrowserConfig::builder()
        .chrome_executable(executable)
        .arg("--headless=new")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .build()
        .map_err(|e| -> PortError { format!("failed to build browser config: {e}").into() })?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| -> PortError { format!("failed to launch browser: {e}").into() })?;
    let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

    let outcome = async {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| -> PortError { format!("failed to open page: {e}").into() })?;
        page.wait_for_navigation()
            .await
            .map_err(|e| -> PortError { format!("page never settled: {e}").into() })?;
        let bytes = page
            .pdf(PrintToPdfParams::default())
            .await
            .map_err(|e| -> PortError { format!("print to document failed: {e}").into() })?;
        let _ = page.close().await;
        Ok::<_, PortError>(bytes)
    }
    .await;

    // Tear the session down regardless of how the capture went.
    if let Err(e) = browser.close().await {
        warn!(error = %e, "Browser did not close cleanly");
    }
    driver.abort();

    match &outcome {
        Ok(bytes) => debug!(size = bytes.len(), "Rendered page to document payload"),
        Err(e) => warn!(url = %url, error = %e, "Render attempt failed"),
    }
    outcome
}
