//! # ziptext
//!
//! Extracts plain text from the result archives an OCR/layout pipeline
//! produces, segments it into bounded chunks, and hands the chunks to a
//! downstream consumer while persisting the full text.
//!
//! The archives are ordinary ZIP containers; the recognized text lives in
//! well-known entries (`markdown.md`, with `text.txt` as the fallback).
//! The reader works entirely over an in-memory buffer: no file-system or
//! network access happens inside the core, and the sender and store are
//! injected by the host.
//!
//! ## Example
//!
//! ```no_run
//! use ziptext::{Pipeline, RecordStore, SegmentSender, SegmentPayload, TextUpdate};
//! use ziptext::error::BoxError;
//! use async_trait::async_trait;
//!
//! struct PrintSender;
//!
//! #[async_trait]
//! impl SegmentSender for PrintSender {
//!     async fn send(&self, payload: &SegmentPayload) -> Result<(), BoxError> {
//!         println!("segment {}/{}", payload.index, payload.total);
//!         Ok(())
//!     }
//! }
//!
//! struct AckStore;
//!
//! #[async_trait]
//! impl RecordStore for AckStore {
//!     async fn update(
//!         &self,
//!         _table: &str,
//!         record_id: &str,
//!         _update: TextUpdate<'_>,
//!     ) -> Result<Vec<String>, BoxError> {
//!         Ok(vec![record_id.to_string()])
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bytes = tokio::fs::read("result.zip").await?;
//!     let pipeline = Pipeline::new(PrintSender, AckStore, "documents");
//!     let report = pipeline.run(&bytes, "doc-42").await?;
//!     println!("{} chars in {} segments", report.char_count, report.segments_sent);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod segment;
pub mod zip;

pub use cli::Cli;
pub use error::PipelineError;
pub use pipeline::{
    Pipeline, PipelineObserver, PipelineReport, RecordStore, SegmentPayload, SegmentSender,
    TextUpdate,
};
pub use segment::{segment, DEFAULT_SEGMENT_CHARS};
pub use zip::{EntryDescriptor, TextExtractor};
