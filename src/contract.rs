//! # contract: ports and shared data model for the watch pipeline
//!
//! This module defines the narrow interfaces the pipeline calls through and the
//! plain data types that cross them. Every external collaborator (the source
//! index, the document existence probe, the page renderer, the generation
//! service, the storage backend and the notification channel) is a single
//! async trait here, so any backing provider can be substituted without
//! touching pipeline logic.
//!
//! ## Interface & Extensibility
//! - Implement a trait to plug in a new provider (API client, local fs, mock).
//! - All port methods are async and return boxed error trait objects; the
//!   typed failure taxonomy lives at the pipeline boundary, not here.
//! - The watermark store is the one synchronous contract: a single scalar,
//!   read once per run and advanced once per committed entry.
//!
//! ## Mocking & Testing
//! - Traits are annotated for `mockall`; deterministic mocks are exported to
//!   the test suite under the `test-export-mocks` feature.

use async_trait::async_trait;

use mockall::automock;

/// Uniform boxed error for port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// One row of the source's published-circular listing.
///
/// Produced fresh on every index fetch, immutable, never persisted beyond the
/// run that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListingEntry {
    /// Source-assigned identifier, unique and monotonically issued.
    pub id: String,
    /// The circular number as printed in the listing.
    pub number: String,
    /// Issue date exactly as the source displays it.
    pub issued_on: String,
    /// Issuing department.
    pub department: String,
    /// Subject line.
    pub subject: String,
    /// Absolute URL of the circular's detail page.
    pub detail_url: String,
}

/// How a circular's byte payload was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    /// A direct downloadable document linked from the detail page.
    DirectDocument,
    /// The rendered detail page converted into a document payload.
    RenderedPage,
}

/// Payload classification, used by the storage backend for naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// A document published by the source itself.
    Pdf,
    /// A document derived from the rendered detail page.
    HtmlDerivedPdf,
    /// A generated compliance checklist.
    Checklist,
}

/// A circular's full content, held only for the duration of one entry's
/// pipeline run.
#[derive(Debug, Clone)]
pub struct AcquiredContent {
    pub bytes: Vec<u8>,
    pub kind: PayloadKind,
    pub strategy: AcquisitionStrategy,
}

/// The derived checklist document, same lifecycle as [`AcquiredContent`].
#[derive(Debug, Clone)]
pub struct ChecklistArtifact {
    pub bytes: Vec<u8>,
    pub kind: PayloadKind,
}

/// Stable locators returned by the storage backend, consumed by the notifier.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublishedReference {
    pub document_locator: String,
    pub checklist_locator: String,
}

/// Error raised by the content acquirer when every strategy is exhausted.
#[derive(Debug)]
pub enum AcquireError {
    /// The detail page itself could not be fetched.
    DetailPage(String),
    /// Every acquisition strategy failed for the entry.
    Exhausted(String),
}

impl std::fmt::Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquireError::DetailPage(msg) => write!(f, "detail page unavailable: {msg}"),
            AcquireError::Exhausted(msg) => write!(f, "all acquisition strategies failed: {msg}"),
        }
    }
}

impl std::error::Error for AcquireError {}

/// Error raised by the text extractor.
#[derive(Debug)]
pub enum ExtractError {
    /// The payload parsed but carries no extractable text layer.
    NoTextLayer,
    /// The payload could not be parsed at all.
    Parse(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::NoTextLayer => write!(f, "payload has no extractable text layer"),
            ExtractError::Parse(msg) => write!(f, "payload could not be parsed: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Trait for fetching the current published-circular listing, newest-first.
///
/// Implementations must either return fully-typed entries or fail outright;
/// partially-parsed records are a contract violation. The pipeline treats any
/// error here as fatal for the run.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IndexPort: Send + Sync {
    async fn listing(&self) -> Result<Vec<ListingEntry>, PortError>;
}

/// Trait for the lightweight document existence probe.
///
/// `true` only when the URL answers successfully with a document content type.
/// Transport errors are reported as `false`: a candidate that cannot be
/// verified is a candidate that failed fast.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProbePort: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Trait for converting a rendered page into a document payload.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RenderPort: Send + Sync {
    async fn render_to_document(&self, url: &str) -> Result<Vec<u8>, PortError>;
}

/// Trait for obtaining one entry's full content via the strategy chain.
///
/// Implemented by the HTTP acquirer and by test mocks; the pipeline only sees
/// this contract.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentAcquirer: Send + Sync {
    async fn acquire(&self, entry: &ListingEntry) -> Result<AcquiredContent, AcquireError>;
}

/// Trait for converting an acquired payload into plain text.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TextExtractor: Send + Sync {
    fn extract(&self, content: &AcquiredContent) -> Result<String, ExtractError>;
}

/// Trait for the external generation service. Opaque to the core beyond the
/// input/output contract: plain text in, generated document text out.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait GeneratePort: Send + Sync {
    async fn generate(&self, text: &str) -> Result<Vec<u8>, PortError>;
}

/// Trait for publishing a payload to the storage backend.
///
/// The implementation decides the storage hierarchy; the core only depends on
/// receiving a stable locator back.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StorePort: Send + Sync {
    async fn publish(
        &self,
        bytes: &[u8],
        kind: PayloadKind,
        entry: &ListingEntry,
    ) -> Result<String, PortError>;
}

/// Trait for notifying stakeholders about a published circular.
///
/// Fire-and-forget from the core's perspective: a failure here is logged and
/// never blocks watermark advancement.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait NotifyPort: Send + Sync {
    async fn notify(
        &self,
        entry: &ListingEntry,
        reference: &PublishedReference,
    ) -> Result<(), PortError>;
}

/// Contract for the persisted watermark: the id of the last fully processed
/// circular.
///
/// `read` on a missing or empty store yields `None`, signalling that no entry
/// has ever been committed. `write` must be atomic with respect to process
/// crash so a half-written watermark can never be observed.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait StateStore: Send + Sync {
    fn read(&self) -> Result<Option<String>, PortError>;
    fn write(&self, id: &str) -> Result<(), PortError>;
}
