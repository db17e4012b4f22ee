//! Main entry point for the ziptext CLI application.
//!
//! This binary is a thin host around the extraction pipeline: it reads the
//! archive bytes from disk, wires stdout/file-backed collaborators into the
//! pipeline, and prints progress. All archive parsing happens in the
//! library.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use ziptext::error::BoxError;
use ziptext::{
    Cli, Pipeline, PipelineObserver, RecordStore, SegmentPayload, SegmentSender, TextExtractor,
    TextUpdate,
};

/// Application entry point.
///
/// Parses command-line arguments, reads the archive into memory, and runs
/// either the listing mode or the full extraction pipeline.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let bytes = tokio::fs::read(&cli.archive)
        .await
        .with_context(|| format!("failed to read archive: {}", cli.archive))?;

    if cli.list {
        return list_entries(&bytes);
    }

    let sender = StdoutSender;
    let store = match cli.output {
        Some(ref path) => HostStore::File(PathBuf::from(path)),
        None => HostStore::Ack,
    };

    let pipeline = Pipeline::new(sender, store, "documents")
        .with_segment_chars(cli.segment_chars)
        .with_observer(Arc::new(Progress {
            quiet: cli.is_quiet(),
        }));

    let report = pipeline.run(&bytes, &cli.effective_record_id()).await?;

    if !cli.is_quiet() {
        eprintln!(
            "\nExtracted {} characters in {} segment(s)",
            report.char_count, report.segments_sent
        );
    }

    Ok(())
}

/// List archive entries, one per line with sizes and method.
fn list_entries(bytes: &[u8]) -> Result<()> {
    let entries = TextExtractor::new(bytes).entries()?;

    println!("{:>10}  {:>10}  {:>6}  Name", "Length", "Size", "Method");
    println!("{}", "-".repeat(50));
    for entry in &entries {
        println!(
            "{:>10}  {:>10}  {:>6}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            entry.compression_method.as_u16(),
            entry.file_name
        );
    }

    Ok(())
}

/// Sender that writes segment contents to stdout, in order.
struct StdoutSender;

#[async_trait]
impl SegmentSender for StdoutSender {
    async fn send(&self, payload: &SegmentPayload) -> Result<(), BoxError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(payload.content.as_bytes()).await?;
        if payload.index == payload.total {
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
        Ok(())
    }
}

/// Host-side persistence: either writes the full text to a file or just
/// acknowledges the update.
enum HostStore {
    File(PathBuf),
    Ack,
}

#[async_trait]
impl RecordStore for HostStore {
    async fn update(
        &self,
        _table: &str,
        record_id: &str,
        update: TextUpdate<'_>,
    ) -> Result<Vec<String>, BoxError> {
        if let HostStore::File(path) = self {
            tokio::fs::write(path, update.extracted_text).await?;
        }
        Ok(vec![record_id.to_string()])
    }
}

/// Progress reporting to stderr, silenced by `-q`.
struct Progress {
    quiet: bool,
}

impl PipelineObserver for Progress {
    fn on_text_extracted(&self, char_count: usize) {
        if !self.quiet {
            eprintln!("  extracted: {char_count} characters");
        }
    }

    fn on_segment_sent(&self, index: usize, total: usize) {
        if !self.quiet {
            eprintln!("  sent: segment {index}/{total}");
        }
    }

    fn on_persisted(&self, record_id: &str, affected: usize) {
        if !self.quiet {
            eprintln!("  persisted: {record_id} ({affected} record(s))");
        }
    }
}
