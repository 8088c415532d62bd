//! High-level pipeline: detect new circulars and run each through
//! acquisition → extraction → generation → publish → notify, advancing the
//! watermark one committed entry at a time.
//!
//! # Major Types
//! - [`Collaborators`]: the ports one run is wired to
//! - [`RunReport`]: committed vs failed entries for downstream audit
//!
//! # Responsibilities
//! - Reads the watermark once at run start and advances it immediately after
//!   each entry's full unit of work succeeds, never batched at run end, so a
//!   crash loses at most the in-flight entry.
//! - A per-entry failure is recorded with its stage and the loop continues;
//!   the watermark is never advanced past a failed entry, which keeps it
//!   first in line for the next run.
//! - Index unavailability aborts the run with the watermark untouched.
//!
//! # Error Handling
//! Per-entry failures are caught at this boundary and attributed to a named
//! stage; only [`RunError`] variants abort the whole run.
//!
//! # Navigation
//! - Main entrypoint: [`run_cycle`]
//! - Supporting types: [`Stage`], [`CommittedEntry`], [`FailedEntry`]

use tracing::{debug, error, info, warn};

use crate::contract::{
    ContentAcquirer, GeneratePort, IndexPort, ListingEntry, NotifyPort, PublishedReference,
    StateStore, StorePort, TextExtractor,
};
use crate::generate::build_checklist;
use crate::resolve::resolve_new_entries;

/// The ports one watch run calls through.
pub struct Collaborators<'a> {
    pub index: &'a dyn IndexPort,
    pub acquirer: &'a dyn ContentAcquirer,
    pub extractor: &'a dyn TextExtractor,
    pub generator: &'a dyn GeneratePort,
    pub store: &'a dyn StorePort,
    pub notifier: &'a dyn NotifyPort,
    pub state: &'a dyn StateStore,
}

/// Named failure points of one entry's unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Extract,
    Generate,
    Publish,
    Notify,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Acquire => "acquire",
            Stage::Extract => "extract",
            Stage::Generate => "generate",
            Stage::Publish => "publish",
            Stage::Notify => "notify",
        };
        write!(f, "{name}")
    }
}

/// Errors fatal to a whole run.
#[derive(Debug)]
pub enum RunError {
    /// The source index could not be fetched or parsed; nothing is new.
    SourceUnavailable(String),
    /// The watermark store failed; continuing would break retry guarantees.
    State(String),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::SourceUnavailable(msg) => write!(f, "source unavailable: {msg}"),
            RunError::State(msg) => write!(f, "watermark store failed: {msg}"),
        }
    }
}

impl std::error::Error for RunError {}

/// Outcome summary of one run.
#[derive(Debug)]
pub struct RunReport {
    pub watermark_before: Option<String>,
    pub watermark_after: Option<String>,
    pub committed: Vec<CommittedEntry>,
    pub failed: Vec<FailedEntry>,
}

/// An entry whose full unit of work succeeded.
#[derive(Debug)]
pub struct CommittedEntry {
    pub id: String,
    pub number: String,
    pub reference: PublishedReference,
    /// False when the notification failed after a successful publish; the
    /// entry still counts as committed.
    pub notified: bool,
    /// False when an earlier entry in the same run failed: the work is
    /// published but the watermark stays behind the failed entry.
    pub watermarked: bool,
}

/// An entry that failed at a named stage and stays pending for the next run.
#[derive(Debug)]
pub struct FailedEntry {
    pub id: String,
    pub number: String,
    pub stage: Stage,
    pub detail: String,
}

/// Run one full watch cycle.
pub async fn run_cycle(c: &Collaborators<'_>) -> Result<RunReport, RunError> {
    info!("[WATCH] Starting circular watch cycle");

    let watermark = c
        .state
        .read()
        .map_err(|e| RunError::State(e.to_string()))?;
    info!(watermark = ?watermark, "[WATCH] Loaded watermark");

    let listing = match c.index.listing().await {
        Ok(listing) => listing,
        Err(e) => {
            error!(error = %e, "[WATCH][ERROR] Index fetch failed; aborting run");
            return Err(RunError::SourceUnavailable(e.to_string()));
        }
    };

    let entries = resolve_new_entries(&listing, watermark.as_deref());
    if entries.is_empty() {
        info!("[WATCH] No new circulars; nothing to do");
        return Ok(RunReport {
            watermark_after: watermark.clone(),
            watermark_before: watermark,
            committed: Vec::new(),
            failed: Vec::new(),
        });
    }
    info!(count = entries.len(), "[WATCH] Processing new circulars oldest-first");

    let mut committed: Vec<CommittedEntry> = Vec::new();
    let mut failed: Vec<FailedEntry> = Vec::new();
    let mut current_mark = watermark.clone();
    let mut advance_blocked = false;

    for entry in &entries {
        info!(id = %entry.id, number = %entry.number, subject = %entry.subject, "[WATCH] New circular detected");
        match process_entry(c, entry).await {
            Ok((reference, notified)) => {
                let watermarked = !advance_blocked;
                if watermarked {
                    c.state
                        .write(&entry.id)
                        .map_err(|e| RunError::State(e.to_string()))?;
                    current_mark = Some(entry.id.clone());
                } else {
                    warn!(
                        id = %entry.id,
                        "[WATCH] Entry completed behind a failed one; watermark held back"
                    );
                }
                committed.push(CommittedEntry {
                    id: entry.id.clone(),
                    number: entry.number.clone(),
                    reference,
                    notified,
                    watermarked,
                });
            }
            Err((stage, detail)) => {
                error!(
                    id = %entry.id,
                    stage = %stage,
                    detail = %detail,
                    "[WATCH][ERROR] Entry failed; it stays pending for the next run"
                );
                advance_blocked = true;
                failed.push(FailedEntry {
                    id: entry.id.clone(),
                    number: entry.number.clone(),
                    stage,
                    detail,
                });
            }
        }
    }

    info!(
        committed = committed.len(),
        failed = failed.len(),
        watermark = ?current_mark,
        "[WATCH] Cycle complete"
    );
    Ok(RunReport {
        watermark_before: watermark,
        watermark_after: current_mark,
        committed,
        failed,
    })
}

/// One entry's unit of work: Acquiring → Extracting → Generating → Publishing
/// → Notifying. Any stage failure surfaces with its stage name; a notification
/// failure alone does not fail the unit, since the publish already happened.
async fn process_entry(
    c: &Collaborators<'_>,
    entry: &ListingEntry,
) -> Result<(PublishedReference, bool), (Stage, String)> {
    debug!(id = %entry.id, state = "Acquiring", "[WATCH] Entry state");
    let content = c
        .acquirer
        .acquire(entry)
        .await
        .map_err(|e| (Stage::Acquire, e.to_string()))?;

    debug!(id = %entry.id, state = "Extracting", "[WATCH] Entry state");
    let text = c
        .extractor
        .extract(&content)
        .map_err(|e| (Stage::Extract, e.to_string()))?;

    debug!(id = %entry.id, state = "Generating", "[WATCH] Entry state");
    let checklist = build_checklist(c.generator, entry, &text)
        .await
        .map_err(|e| (Stage::Generate, e.to_string()))?;

    debug!(id = %entry.id, state = "Publishing", "[WATCH] Entry state");
    let document_locator = c
        .store
        .publish(&content.bytes, content.kind, entry)
        .await
        .map_err(|e| (Stage::Publish, e.to_string()))?;
    let checklist_locator = c
        .store
        .publish(&checklist.bytes, checklist.kind, entry)
        .await
        .map_err(|e| (Stage::Publish, e.to_string()))?;
    let reference = PublishedReference {
        document_locator,
        checklist_locator,
    };

    debug!(id = %entry.id, state = "Notifying", "[WATCH] Entry state");
    let notified = match c.notifier.notify(entry, &reference).await {
        Ok(()) => true,
        Err(e) => {
            // Publish already succeeded; reprocessing the entry over a lost
            // notification would duplicate the archive.
            warn!(id = %entry.id, error = %e, "[WATCH] Notification failed (non-fatal)");
            false
        }
    };

    debug!(id = %entry.id, state = "Committed", "[WATCH] Entry state");
    Ok((reference, notified))
}
