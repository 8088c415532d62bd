use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Fully merged runtime configuration for one watch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub source: SourceConfig,
    /// Path of the persisted watermark file.
    pub state_path: PathBuf,
    /// Root directory of the published archive.
    pub archive_root: PathBuf,
    pub generation: GenerationConfig,
    pub notify: NotifyConfig,
    pub timeouts: TimeoutConfig,
}

impl WatchConfig {
    pub fn trace_loaded(&self) {
        info!(
            index_url = %self.source.index_url,
            state_path = %self.state_path.display(),
            archive_root = %self.archive_root.display(),
            model = %self.generation.model,
            "Loaded WatchConfig"
        );
        debug!(?self, "WatchConfig loaded (full debug)");
    }
}

/// Where and how the published-circular index is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the tabular listing page.
    pub index_url: String,
    /// Base URL that relative detail links resolve against.
    pub link_base: String,
    /// Substring identifying a circular detail link in the listing table.
    pub detail_marker: String,
    /// Query parameter carrying the source-assigned id on detail links.
    #[serde(default = "default_id_param")]
    pub id_param: String,
    /// URL templates tried when a detail page exposes no document link;
    /// `{id}` expands to the entry id.
    #[serde(default)]
    pub document_url_patterns: Vec<String>,
    /// Substrings marking noise links that must never be treated as the
    /// circular's own document.
    #[serde(default)]
    pub link_ignore: Vec<String>,
}

fn default_id_param() -> String {
    "Id".to_string()
}

/// Settings for the external generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    /// Service base URL; overridable for test servers.
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// Secret, injected from the environment by the config loader.
    #[serde(skip_serializing, default)]
    pub api_key: String,
}

pub(crate) fn default_generation_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Settings for the stakeholder notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoint, injected from the environment by the config loader.
    pub webhook_url: String,
}

/// Explicit timeouts for every class of outbound call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_fetch_secs")]
    pub fetch_secs: u64,
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
    #[serde(default = "default_render_secs")]
    pub render_secs: u64,
    #[serde(default = "default_generate_secs")]
    pub generate_secs: u64,
    #[serde(default = "default_notify_secs")]
    pub notify_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch_secs: default_fetch_secs(),
            probe_secs: default_probe_secs(),
            render_secs: default_render_secs(),
            generate_secs: default_generate_secs(),
            notify_secs: default_notify_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch_secs)
    }
    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
    pub fn render(&self) -> Duration {
        Duration::from_secs(self.render_secs)
    }
    pub fn generate(&self) -> Duration {
        Duration::from_secs(self.generate_secs)
    }
    pub fn notify(&self) -> Duration {
        Duration::from_secs(self.notify_secs)
    }
}

fn default_fetch_secs() -> u64 {
    30
}
fn default_probe_secs() -> u64 {
    10
}
fn default_render_secs() -> u64 {
    45
}
fn default_generate_secs() -> u64 {
    120
}
fn default_notify_secs() -> u64 {
    15
}
