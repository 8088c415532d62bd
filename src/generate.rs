//! Checklist generation: delegates to the external generation service and
//! typesets the returned text into a publishable artifact.

use tracing::{error, info};

use crate::config::GenerationConfig;
use crate::contract::{ChecklistArtifact, GeneratePort, ListingEntry, PayloadKind, PortError};
use crate::typeset;

/// Instruction handed to the generation service ahead of the circular text.
const CHECKLIST_INSTRUCTION: &str = "As an expert in banking regulation and cybersecurity, \
analyze the provided text to generate a unified, exhaustive compliance checklist, grouping \
all requirements under clear headings and converting each specific, detailed item into an \
audit-ready yes/no question without omitting any conditions or timeframes.";

#[derive(Debug)]
pub enum GenerateError {
    /// The generation service failed or answered with an error status.
    Service(String),
    /// The service answered but produced no usable text.
    EmptyResponse,
    /// The generated text could not be typeset into an artifact.
    Typeset(String),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Service(msg) => write!(f, "generation service failed: {msg}"),
            GenerateError::EmptyResponse => write!(f, "generation service returned no text"),
            GenerateError::Typeset(msg) => write!(f, "checklist could not be typeset: {msg}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Run generation for one circular and typeset the result.
pub async fn build_checklist(
    generator: &dyn GeneratePort,
    entry: &ListingEntry,
    circular_text: &str,
) -> Result<ChecklistArtifact, GenerateError> {
    info!(id = %entry.id, number = %entry.number, "Generating compliance checklist");
    let raw = generator
        .generate(circular_text)
        .await
        .map_err(|e| GenerateError::Service(e.to_string()))?;
    let text = String::from_utf8_lossy(&raw);
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    let title = format!("Compliance Checklist - {}", entry.number);
    let bytes = typeset::text_to_pdf(&title, text.trim())
        .map_err(|e| GenerateError::Typeset(e.to_string()))?;
    info!(id = %entry.id, size = bytes.len(), "Checklist artifact ready");
    Ok(ChecklistArtifact {
        bytes,
        kind: PayloadKind::Checklist,
    })
}

/// Generation port adapter for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig, timeout: std::time::Duration) -> Result<Self, PortError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| -> PortError { format!("failed to build http client: {e}").into() })?;
        Ok(Self { http, config })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait::async_trait]
impl GeneratePort for GeminiClient {
    async fn generate(&self, text: &str) -> Result<Vec<u8>, PortError> {
        let prompt = format!("{CHECKLIST_INSTRUCTION}\n\nCircular Text:\n{text}\n\nCompliance Checklist:");
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let url = self.request_url();
        info!(model = %self.config.model, "Calling generation service");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| -> PortError { format!("generation request failed: {e}").into() })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(status = %status, "Generation service returned error. Response body: {detail}");
            return Err(format!("generation service returned status {status}").into());
        }

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| -> PortError { format!("generation response unreadable: {e}").into() })?;
        let generated = payload
            .get("candidates")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.get("parts"))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("text"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| -> PortError { "generation response carried no text".into() })?;

        Ok(generated.trim().as_bytes().to_vec())
    }
}
