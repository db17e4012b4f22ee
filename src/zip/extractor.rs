//! Plain text extraction from an archive buffer.
//!
//! The OCR pipeline writes its recognized output into the archive under a
//! small set of well-known filenames. This module scans the central
//! directory for those names, decodes each match, and assembles one
//! ordered text blob.

use tracing::debug;

use crate::error::PipelineError;

use super::decoder::decode_entry_text;
use super::parser::ArchiveParser;
use super::structures::EntryDescriptor;

/// Recognized text entry basenames, highest priority first.
///
/// Markdown output always precedes the plain-text fallback in the
/// assembled blob, regardless of where either sits in the archive.
pub const TEXT_ENTRY_PRIORITY: [&str; 2] = ["markdown.md", "text.txt"];

/// One decoded text entry awaiting the final sort/join.
struct TextFragment {
    /// Rank of the whitelist name that matched (lower wins).
    priority: usize,
    /// Discovery index in central-directory order; stable tie-break.
    order: usize,
    content: String,
}

/// Plain text extractor over an in-memory archive buffer.
pub struct TextExtractor<'a> {
    archive: &'a [u8],
    parser: ArchiveParser<'a>,
}

impl<'a> TextExtractor<'a> {
    pub fn new(archive: &'a [u8]) -> Self {
        Self {
            archive,
            parser: ArchiveParser::new(archive),
        }
    }

    /// List all entries in the archive.
    pub fn entries(&self) -> Result<Vec<EntryDescriptor>, PipelineError> {
        self.parser.list_entries()
    }

    /// Extract the archive's plain text.
    ///
    /// Scans all entries, decodes those whose lowercased basename appears
    /// in [`TEXT_ENTRY_PRIORITY`], and joins the trimmed contents with a
    /// blank line, ordered by (priority, discovery order). Directory
    /// entries and entries without a usable filename are skipped.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NoMatchingContent`] when no recognized name is
    ///   present in the archive
    /// - [`PipelineError::EmptyExtractedText`] when every match trims to
    ///   nothing
    /// - any structural or decoding error from the parsing pass
    pub fn extract_plain_text(&self) -> Result<String, PipelineError> {
        let entries = self.parser.list_entries()?;
        debug!(entries = entries.len(), "parsed central directory");

        let mut fragments: Vec<TextFragment> = Vec::new();
        for entry in &entries {
            if entry.is_directory {
                continue;
            }
            let Some(base) = entry.base_name() else {
                continue;
            };
            let lowered = base.to_lowercase();
            let Some(priority) = TEXT_ENTRY_PRIORITY.iter().position(|n| *n == lowered) else {
                continue;
            };

            let content = decode_entry_text(self.archive, entry)?;
            fragments.push(TextFragment {
                priority,
                order: fragments.len(),
                content: content.trim().to_string(),
            });
        }

        if fragments.is_empty() {
            return Err(PipelineError::NoMatchingContent);
        }

        fragments.sort_by_key(|f| (f.priority, f.order));

        let text = fragments
            .iter()
            .filter(|f| !f.content.is_empty())
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        if text.trim().is_empty() {
            return Err(PipelineError::EmptyExtractedText);
        }

        debug!(
            fragments = fragments.len(),
            chars = text.chars().count(),
            "assembled plain text"
        );
        Ok(text)
    }
}
