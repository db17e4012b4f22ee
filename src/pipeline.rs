//! Extraction pipeline orchestration.
//!
//! Sequences the full run: extract plain text from the archive buffer,
//! deliver it segment by segment to an injected sender, then persist the
//! full text through an injected record store. Segments are sent strictly
//! in order, each send awaited before the next, so consumers can rely on
//! receiving segment `k` before `k + 1`.
//!
//! All failures abort the remaining steps immediately; there is no retry
//! or partial-success reporting.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::{BoxError, PipelineError};
use crate::segment::{segment, DEFAULT_SEGMENT_CHARS};
use crate::zip::TextExtractor;

/// One chunk of extracted text handed to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPayload {
    pub content: String,
    /// 1-based position of this segment.
    pub index: usize,
    /// Total number of segments in this run.
    pub total: usize,
}

/// Fields persisted for one processed archive.
#[derive(Debug, Clone, Copy)]
pub struct TextUpdate<'a> {
    pub extracted_text: &'a str,
    pub extracted_text_char_count: usize,
}

/// Downstream consumer of text segments.
#[async_trait]
pub trait SegmentSender: Send + Sync {
    async fn send(&self, payload: &SegmentPayload) -> Result<(), BoxError>;
}

/// Update operation against a named record store.
///
/// Implementations return the identifiers of the affected records; an
/// empty list is treated as a failed update by the pipeline.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn update(
        &self,
        table: &str,
        record_id: &str,
        update: TextUpdate<'_>,
    ) -> Result<Vec<String>, BoxError>;
}

/// Progress callbacks invoked at the pipeline's defined points.
///
/// All methods default to no-ops; hosts install an observer to report
/// progress instead of the pipeline writing to a process-wide channel.
pub trait PipelineObserver: Send + Sync {
    fn on_text_extracted(&self, _char_count: usize) {}
    fn on_segment_sent(&self, _index: usize, _total: usize) {}
    fn on_persisted(&self, _record_id: &str, _affected: usize) {}
}

struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Aggregate result of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub text: String,
    pub char_count: usize,
    pub segments_sent: usize,
}

/// Extraction pipeline with injected collaborators.
pub struct Pipeline<S, R> {
    sender: S,
    store: R,
    segment_chars: usize,
    table: String,
    observer: Arc<dyn PipelineObserver>,
}

impl<S: SegmentSender, R: RecordStore> Pipeline<S, R> {
    pub fn new(sender: S, store: R, table: impl Into<String>) -> Self {
        Self {
            sender,
            store,
            segment_chars: DEFAULT_SEGMENT_CHARS,
            table: table.into(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Override the segment window size (defaults to
    /// [`DEFAULT_SEGMENT_CHARS`]).
    pub fn with_segment_chars(mut self, chars: usize) -> Self {
        self.segment_chars = chars;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full pipeline over one archive buffer.
    ///
    /// Returns the extracted text, its character count, and the number of
    /// segments delivered. The first failure of extraction, any send, or
    /// the store update aborts the run and is returned unchanged.
    pub async fn run(
        &self,
        archive: &[u8],
        record_id: &str,
    ) -> Result<PipelineReport, PipelineError> {
        let text = TextExtractor::new(archive).extract_plain_text()?;
        let char_count = text.chars().count();
        self.observer.on_text_extracted(char_count);

        let segments = segment(&text, self.segment_chars)?;
        let total = segments.len();
        debug!(char_count, segments = total, "extracted text, delivering");

        // Strictly sequential: each send is awaited before the next one
        // is issued, preserving segment order for the consumer.
        for (i, content) in segments.into_iter().enumerate() {
            let payload = SegmentPayload {
                content,
                index: i + 1,
                total,
            };
            self.sender
                .send(&payload)
                .await
                .map_err(PipelineError::SendFailed)?;
            self.observer.on_segment_sent(payload.index, total);
        }

        let update = TextUpdate {
            extracted_text: &text,
            extracted_text_char_count: char_count,
        };
        let affected = self
            .store
            .update(&self.table, record_id, update)
            .await
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;
        if affected.is_empty() {
            return Err(PipelineError::NoRowsUpdated(record_id.to_string()));
        }
        self.observer.on_persisted(record_id, affected.len());
        debug!(record_id, affected = affected.len(), "persisted full text");

        Ok(PipelineReport {
            text,
            char_count,
            segments_sent: total,
        })
    }
}
