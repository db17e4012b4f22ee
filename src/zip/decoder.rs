//! Entry payload decoding.
//!
//! Slices an entry's raw bytes out of the archive buffer and turns them
//! into text according to the entry's declared compression method.

use flate2::read::DeflateDecoder;
use std::io::Read;

use crate::error::PipelineError;

use super::structures::{CompressionMethod, EntryDescriptor};

/// Decode one entry's payload as UTF-8 text.
///
/// STORED payloads are interpreted directly; DEFLATE payloads are
/// raw-deflate decompressed first (ZIP stores deflate streams without the
/// zlib framing). Byte sequences that are not valid UTF-8 are replaced
/// lossily; the archive headers are otherwise trusted, so no size
/// cross-check is performed for stored entries.
///
/// # Errors
///
/// - [`PipelineError::ArchiveBoundsExceeded`] when the declared data range
///   runs past the end of the buffer
/// - [`PipelineError::UnsupportedCompressionMethod`] for any method other
///   than STORED or DEFLATE
/// - [`PipelineError::MalformedArchive`] when the deflate stream is corrupt
pub fn decode_entry_text(
    archive: &[u8],
    entry: &EntryDescriptor,
) -> Result<String, PipelineError> {
    let start = entry.data_offset;
    let end = start
        .checked_add(entry.compressed_size)
        .ok_or_else(|| bounds_error(entry, archive.len()))?;
    if end > archive.len() as u64 {
        return Err(bounds_error(entry, archive.len()));
    }

    let raw = &archive[start as usize..end as usize];

    match entry.compression_method {
        CompressionMethod::Stored => Ok(String::from_utf8_lossy(raw).into_owned()),
        CompressionMethod::Deflate => {
            let mut decompressed = Vec::with_capacity(entry.uncompressed_size as usize);
            DeflateDecoder::new(raw)
                .read_to_end(&mut decompressed)
                .map_err(|e| {
                    PipelineError::MalformedArchive(format!(
                        "corrupt deflate stream in `{}`: {e}",
                        entry.file_name
                    ))
                })?;
            Ok(String::from_utf8_lossy(&decompressed).into_owned())
        }
        CompressionMethod::Unknown(method) => {
            Err(PipelineError::UnsupportedCompressionMethod(method))
        }
    }
}

fn bounds_error(entry: &EntryDescriptor, len: usize) -> PipelineError {
    PipelineError::ArchiveBoundsExceeded {
        name: entry.file_name.clone(),
        start: entry.data_offset,
        end: entry.data_offset.saturating_add(entry.compressed_size),
        len: len as u64,
    }
}
