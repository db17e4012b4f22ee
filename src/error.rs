//! Error types for archive parsing, text extraction, and pipeline delivery.

use thiserror::Error;

/// Boxed error type returned by the injected collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the extraction pipeline.
///
/// Every failure is propagated immediately to the caller; there is no
/// local recovery or partial-success path.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Structural damage: bad signatures, missing end-of-central-directory
    /// record, truncated headers, or a corrupt deflate stream.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// The archive uses a ZIP feature this reader does not handle
    /// (streaming entries with data descriptors).
    #[error("unsupported archive feature: {0}")]
    UnsupportedArchiveFeature(&'static str),

    /// Compression method other than STORED (0) or DEFLATE (8).
    #[error("unsupported compression method {0}")]
    UnsupportedCompressionMethod(u16),

    /// An entry's declared data range falls outside the archive buffer.
    #[error("entry `{name}` data range {start}..{end} exceeds archive length {len}")]
    ArchiveBoundsExceeded {
        name: String,
        start: u64,
        end: u64,
        len: u64,
    },

    /// None of the recognized text entry names were found in the archive.
    #[error("archive contains no recognized text entries")]
    NoMatchingContent,

    /// Matching entries were found but the joined text is empty.
    #[error("extracted text is empty")]
    EmptyExtractedText,

    /// Segmenter called with an unusable configuration.
    #[error("invalid segmenter configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The injected segment sender reported a failure.
    #[error("segment delivery failed")]
    SendFailed(#[source] BoxError),

    /// The injected record store reported a failure.
    #[error("store update failed: {0}")]
    Persistence(String),

    /// The store accepted the update but affected zero records.
    #[error("store update affected no rows for record `{0}`")]
    NoRowsUpdated(String),
}
