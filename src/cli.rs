use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::acquire::{DocumentAcquirer, HttpProbe};
use crate::contract::{ProbePort, RenderPort};
use crate::extract::PdfTextExtractor;
use crate::generate::GeminiClient;
use crate::listing::HttpListingClient;
use crate::load_config::load_config;
use crate::notify::WebhookNotifier;
use crate::pipeline::{run_cycle, Collaborators};
use crate::publish::FsArchiveStore;
use crate::render::ChromiumRenderer;
use crate::state::FileStateStore;

/// CLI for circular-watch: detect, archive and announce new circulars.
#[derive(Parser)]
#[clap(
    name = "circular-watch",
    version,
    about = "Watch a regulator's circular index and publish each new issue with a compliance checklist"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one watch cycle using the given config file
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config)?;

            let state = FileStateStore::new(config.state_path.clone());
            let index = HttpListingClient::new(config.source.clone(), config.timeouts.fetch())
                .map_err(|e| anyhow::anyhow!(e))?;
            let probe: Arc<dyn ProbePort> =
                Arc::new(HttpProbe::new(config.timeouts.probe()).map_err(|e| anyhow::anyhow!(e))?);
            let renderer: Arc<dyn RenderPort> =
                Arc::new(ChromiumRenderer::new(config.timeouts.render()));
            let acquirer = DocumentAcquirer::new(
                config.source.clone(),
                probe,
                renderer,
                config.timeouts.fetch(),
            )
            .map_err(|e| anyhow::anyhow!(e))?;
            let extractor = PdfTextExtractor;
            let generator = GeminiClient::new(config.generation.clone(), config.timeouts.generate())
                .map_err(|e| anyhow::anyhow!(e))?;
            let store = FsArchiveStore::new(config.archive_root.clone());
            let notifier = WebhookNotifier::new(config.notify.clone(), config.timeouts.notify())
                .map_err(|e| anyhow::anyhow!(e))?;

            let collaborators = Collaborators {
                index: &index,
                acquirer: &acquirer,
                extractor: &extractor,
                generator: &generator,
                store: &store,
                notifier: &notifier,
                state: &state,
            };

            println!("Watch cycle starting...");
            match run_cycle(&collaborators).await {
                Ok(report) => {
                    println!("Watch cycle complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Watch cycle failed: {}", e);
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
