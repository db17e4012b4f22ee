use clap::Parser;

use crate::segment::DEFAULT_SEGMENT_CHARS;

#[derive(Parser, Debug)]
#[command(name = "ziptext")]
#[command(version)]
#[command(about = "Extract plain text from OCR pipeline result archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  ziptext result.zip                  print the extracted text\n  \
  ziptext -l result.zip               list archive entries\n  \
  ziptext result.zip -o doc.txt       also persist the text to doc.txt")]
pub struct Cli {
    /// Archive file path
    #[arg(value_name = "FILE")]
    pub archive: String,

    /// List archive entries instead of extracting
    #[arg(short = 'l')]
    pub list: bool,

    /// Persist the full text to this file
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<String>,

    /// Record identifier reported to the store
    #[arg(long, value_name = "ID")]
    pub record_id: Option<String>,

    /// Segment window size in characters
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SEGMENT_CHARS)]
    pub segment_chars: usize,

    /// Quiet mode (no progress messages)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    /// Record id from the flag, falling back to the archive's file stem.
    pub fn effective_record_id(&self) -> String {
        if let Some(ref id) = self.record_id {
            return id.clone();
        }
        std::path::Path::new(&self.archive)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.archive.clone())
    }
}
