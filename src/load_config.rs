use crate::config::{
    GenerationConfig, NotifyConfig, SourceConfig, TimeoutConfig, WatchConfig,
};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Schema of the static YAML config file. Holds no secrets; those are
/// injected from the environment when the file is loaded.
#[derive(Deserialize)]
struct StaticConfig {
    source: SourceConfig,
    state_path: PathBuf,
    archive_root: PathBuf,
    generation: GenerationSection,
    #[serde(default)]
    timeouts: TimeoutConfig,
}

#[derive(Deserialize)]
struct GenerationSection {
    model: String,
    #[serde(default)]
    endpoint: Option<String>,
}

/// Loads a static YAML config file (no secrets) and injects required env vars
/// for secrets. Returns a fully merged [`WatchConfig`] or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WatchConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) => {
            info!("GEMINI_API_KEY found in env");
            key
        }
        Err(e) => {
            error!(error = ?e, "GEMINI_API_KEY environment variable not set");
            return Err(anyhow::anyhow!(
                "GEMINI_API_KEY environment variable not set: {e}"
            ));
        }
    };

    let webhook_url = match std::env::var("NOTIFY_WEBHOOK_URL") {
        Ok(url) => {
            info!("NOTIFY_WEBHOOK_URL found in env");
            url
        }
        Err(e) => {
            error!(error = ?e, "NOTIFY_WEBHOOK_URL environment variable not set");
            return Err(anyhow::anyhow!(
                "NOTIFY_WEBHOOK_URL environment variable not set: {e}"
            ));
        }
    };

    let generation = GenerationConfig {
        model: static_conf.generation.model,
        endpoint: static_conf
            .generation
            .endpoint
            .unwrap_or_else(crate::config::default_generation_endpoint),
        api_key,
    };

    let config = WatchConfig {
        source: static_conf.source,
        state_path: static_conf.state_path,
        archive_root: static_conf.archive_root,
        generation,
        notify: NotifyConfig { webhook_url },
        timeouts: static_conf.timeouts,
    };

    config.trace_loaded();
    Ok(config)
}
