//! Notification adapter: announces a published circular to stakeholders over
//! a JSON webhook.

use tracing::info;

use crate::config::NotifyConfig;
use crate::contract::{ListingEntry, NotifyPort, PortError, PublishedReference};

/// Webhook-backed notifier.
pub struct WebhookNotifier {
    http: reqwest::Client,
    config: NotifyConfig,
}

impl WebhookNotifier {
    pub fn new(config: NotifyConfig, timeout: std::time::Duration) -> Result<Self, PortError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| -> PortError { format!("failed to build http client: {e}").into() })?;
        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl NotifyPort for WebhookNotifier {
    async fn notify(
        &self,
        entry: &ListingEntry,
        reference: &PublishedReference,
    ) -> Result<(), PortError> {
        let body = serde_json::json!({
            "event": "circular.published",
            "number": entry.number,
            "issued_on": entry.issued_on,
            "department": entry.department,
            "subject": entry.subject,
            "document_locator": reference.document_locator,
            "checklist_locator": reference.checklist_locator,
        });

        let response = self
            .http
            .post(&self.config.webhook_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| -> PortError { format!("notification request failed: {e}").into() })?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("notification endpoint returned status {status}").into());
        }

        info!(number = %entry.number, "Notification delivered");
        Ok(())
    }
}
