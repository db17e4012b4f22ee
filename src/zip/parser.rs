//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures from an
//! in-memory archive buffer.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) near the buffer's end
//! 2. Read the Central Directory to get metadata for all entries
//! 3. Resolve each entry's payload offset through its Local File Header
//!
//! The OCR pipeline archives this crate consumes are small enough to hold
//! in memory, so the parser works directly over a byte slice.

use std::io::{Cursor, Read};

use crate::error::PipelineError;

use super::structures::*;

/// Low-level ZIP buffer parser.
///
/// Borrows the archive bytes for the duration of one parsing pass; the
/// buffer is never mutated.
///
/// ## Example
///
/// ```ignore
/// let parser = ArchiveParser::new(&bytes);
/// for entry in parser.list_entries()? {
///     // Decode entry data at entry.data_offset...
/// }
/// ```
pub struct ArchiveParser<'a> {
    data: &'a [u8],
}

impl<'a> ArchiveParser<'a> {
    /// Create a new parser over the given archive buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find the End of Central Directory record.
    ///
    /// The EOCD sits at the very end of a ZIP file unless a variable-length
    /// archive comment follows it, so its position is not fixed. Scanning
    /// backward from `len - 22` finds the record closest to the end, which
    /// is the correct one for well-formed archives.
    ///
    /// # Returns
    ///
    /// The byte offset of the EOCD signature within the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedArchive`] if no signature is found,
    /// indicating the buffer is not a valid ZIP archive.
    pub fn find_eocd(&self) -> Result<usize, PipelineError> {
        if self.data.len() >= EndOfCentralDirectory::SIZE {
            for i in (0..=self.data.len() - EndOfCentralDirectory::SIZE).rev() {
                if &self.data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                    return Ok(i);
                }
            }
        }

        Err(PipelineError::MalformedArchive(
            "missing end of central directory record".into(),
        ))
    }

    /// List all entries in the archive.
    ///
    /// Locates the EOCD, then walks the Central Directory, producing one
    /// [`EntryDescriptor`] per entry in central-directory order with its
    /// payload offset already resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if any record signature is invalid, a record is
    /// truncated, or an entry uses streaming mode (data descriptors).
    pub fn list_entries(&self) -> Result<Vec<EntryDescriptor>, PipelineError> {
        let eocd_offset = self.find_eocd()?;
        let eocd = EndOfCentralDirectory::from_bytes(&self.data[eocd_offset..])?;

        let mut cursor = Cursor::new(self.data);
        cursor.set_position(eocd.cd_offset as u64);

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for _ in 0..eocd.total_entries {
            entries.push(self.parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header and resolve its data offset.
    fn parse_cdfh(&self, cursor: &mut Cursor<&[u8]>) -> Result<EntryDescriptor, PipelineError> {
        // Verify the signature (PK\x01\x02)
        let mut sig = [0u8; 4];
        cursor
            .read_exact(&mut sig)
            .map_err(|_| PipelineError::MalformedArchive("truncated central directory".into()))?;
        if sig != CDFH_SIGNATURE {
            return Err(PipelineError::MalformedArchive(
                "invalid central directory signature".into(),
            ));
        }

        let _version_made_by = read_u16(cursor)?;
        let _version_needed = read_u16(cursor)?;
        let flags = read_u16(cursor)?;
        let compression_method = read_u16(cursor)?;
        let _last_mod_time = read_u16(cursor)?;
        let _last_mod_date = read_u16(cursor)?;
        let _crc32 = read_u32(cursor)?;
        let compressed_size = read_u32(cursor)?;
        let uncompressed_size = read_u32(cursor)?;
        let file_name_length = read_u16(cursor)?;
        let extra_field_length = read_u16(cursor)?;
        let file_comment_length = read_u16(cursor)?;
        let _disk_number_start = read_u16(cursor)?;
        let _internal_attrs = read_u16(cursor)?;
        let _external_attrs = read_u32(cursor)?;
        let lfh_offset = read_u32(cursor)?;

        // Streaming entries record their sizes in a trailing data descriptor,
        // which this reader does not follow.
        if flags & FLAG_DATA_DESCRIPTOR != 0 {
            return Err(PipelineError::UnsupportedArchiveFeature(
                "streaming entry with data descriptor",
            ));
        }

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor
            .read_exact(&mut file_name_bytes)
            .map_err(|_| PipelineError::MalformedArchive("truncated central directory".into()))?;
        // Lossy conversion handles non-UTF8 filenames gracefully
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        // Directory entries end with '/'
        let is_directory = file_name.ends_with('/');

        // Skip the extra field and file comment (we don't use them)
        cursor.set_position(
            cursor.position() + extra_field_length as u64 + file_comment_length as u64,
        );

        let data_offset = self.resolve_data_offset(lfh_offset)?;

        Ok(EntryDescriptor {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size: compressed_size as u64,
            uncompressed_size: uncompressed_size as u64,
            data_offset,
            is_directory,
        })
    }

    /// Resolve the payload offset for an entry via its Local File Header.
    ///
    /// The LFH carries its own filename and extra-field lengths, which may
    /// legitimately differ from the central-directory copy, so both lengths
    /// are read from the LFH itself.
    fn resolve_data_offset(&self, lfh_offset: u32) -> Result<u64, PipelineError> {
        let start = lfh_offset as usize;
        let end = start + LFH_SIZE;
        if end > self.data.len() {
            return Err(PipelineError::MalformedArchive(
                "truncated local file header".into(),
            ));
        }

        // Verify LFH signature (PK\x03\x04)
        if &self.data[start..start + 4] != LFH_SIGNATURE {
            return Err(PipelineError::MalformedArchive(
                "invalid local file header signature".into(),
            ));
        }

        let file_name_length =
            u16::from_le_bytes([self.data[start + 26], self.data[start + 27]]) as u64;
        let extra_field_length =
            u16::from_le_bytes([self.data[start + 28], self.data[start + 29]]) as u64;

        // Data starts after: LFH (30 bytes) + filename + extra field
        Ok(lfh_offset as u64 + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ZipBuilder;
    use super::*;

    #[test]
    fn lists_entries_in_central_directory_order() {
        let bytes = ZipBuilder::new()
            .stored("docs/markdown.md", b"# Title")
            .stored("text.txt", b"body")
            .finish();

        let entries = ArchiveParser::new(&bytes).list_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "docs/markdown.md");
        assert_eq!(entries[0].compressed_size, 7);
        assert_eq!(entries[0].uncompressed_size, 7);
        assert_eq!(entries[0].compression_method, CompressionMethod::Stored);
        assert!(!entries[0].is_directory);
        assert_eq!(entries[1].file_name, "text.txt");
    }

    #[test]
    fn resolves_data_offset_from_local_header() {
        let bytes = ZipBuilder::new()
            .stored("text.txt", b"payload")
            .finish();

        let entries = ArchiveParser::new(&bytes).list_entries().unwrap();
        let entry = &entries[0];
        let start = entry.data_offset as usize;
        let end = start + entry.compressed_size as usize;
        assert_eq!(&bytes[start..end], b"payload");
    }

    #[test]
    fn local_extra_field_length_wins_over_central_copy() {
        // The local header carries a 12-byte extra field absent from the
        // central directory record.
        let bytes = ZipBuilder::new()
            .stored_with_local_extra("text.txt", b"payload", &[0u8; 12])
            .finish();

        let entries = ArchiveParser::new(&bytes).list_entries().unwrap();
        let entry = &entries[0];
        let start = entry.data_offset as usize;
        let end = start + entry.compressed_size as usize;
        assert_eq!(&bytes[start..end], b"payload");
    }

    #[test]
    fn finds_eocd_behind_archive_comment() {
        let bytes = ZipBuilder::new()
            .stored("text.txt", b"hi")
            .finish_with_comment(b"produced by ocr pipeline v3");

        let entries = ArchiveParser::new(&bytes).list_entries().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn directory_entries_are_flagged() {
        let bytes = ZipBuilder::new()
            .directory("images/")
            .stored("images/text.txt", b"x")
            .finish();

        let entries = ArchiveParser::new(&bytes).list_entries().unwrap();
        assert!(entries[0].is_directory);
        assert!(!entries[1].is_directory);
    }

    #[test]
    fn rejects_buffer_without_eocd() {
        let err = ArchiveParser::new(b"not a zip archive at all")
            .list_entries()
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedArchive(_)));
    }

    #[test]
    fn rejects_empty_buffer() {
        let err = ArchiveParser::new(b"").find_eocd().unwrap_err();
        assert!(matches!(err, PipelineError::MalformedArchive(_)));
    }

    #[test]
    fn rejects_corrupt_central_directory_signature() {
        let mut bytes = ZipBuilder::new().stored("text.txt", b"hi").finish();
        // Locate the CDFH signature and clobber it.
        let pos = bytes
            .windows(4)
            .position(|w| w == CDFH_SIGNATURE)
            .unwrap();
        bytes[pos] = b'X';

        let err = ArchiveParser::new(&bytes).list_entries().unwrap_err();
        match err {
            PipelineError::MalformedArchive(msg) => {
                assert!(msg.contains("central directory signature"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_corrupt_local_header_signature() {
        let mut bytes = ZipBuilder::new().stored("text.txt", b"hi").finish();
        // The first LFH sits at offset 0.
        bytes[0] = b'X';

        let err = ArchiveParser::new(&bytes).list_entries().unwrap_err();
        match err {
            PipelineError::MalformedArchive(msg) => {
                assert!(msg.contains("local file header"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_streaming_entries() {
        let bytes = ZipBuilder::new()
            .with_flags("text.txt", b"hi", FLAG_DATA_DESCRIPTOR)
            .finish();

        let err = ArchiveParser::new(&bytes).list_entries().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedArchiveFeature(_)));
    }
}
