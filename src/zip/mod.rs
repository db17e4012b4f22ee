//! ZIP archive parsing and text extraction.
//!
//! This module reads the result archives produced by the OCR/layout
//! pipeline. Those containers are ordinary ZIP files, read here without
//! any file-system access: the whole archive arrives as one in-memory
//! buffer.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements
//!   (EOCD, entry descriptors, signatures)
//! - [`parser`]: Low-level parsing of ZIP structures from the buffer
//! - [`decoder`]: Per-entry payload decoding (stored / raw deflate)
//! - [`extractor`]: Assembly of the prioritized plain-text blob
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each entry
//! 2. Central Directory with metadata for all entries
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Parsing starts from the EOCD at the end of the buffer, then walks the
//! Central Directory, so entry payloads are only touched for the entries
//! that actually carry recognized text.
//!
//! ## Limitations
//!
//! - No encryption support
//! - No ZIP64 or multi-disk archive support
//! - No streaming entries (data descriptors)
//! - No BZIP2, LZMA, or other compression methods
//! - No CRC validation (headers are trusted)

mod decoder;
mod extractor;
mod parser;
mod structures;

pub use decoder::decode_entry_text;
pub use extractor::{TextExtractor, TEXT_ENTRY_PRIORITY};
pub use parser::ArchiveParser;
pub use structures::*;

#[cfg(test)]
pub(crate) mod test_support {
    //! Minimal ZIP writer for building test archives.

    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    pub struct ZipBuilder {
        data: Vec<u8>,
        central: Vec<u8>,
        count: u16,
    }

    impl ZipBuilder {
        pub fn new() -> Self {
            Self {
                data: Vec::new(),
                central: Vec::new(),
                count: 0,
            }
        }

        pub fn stored(self, name: &str, content: &[u8]) -> Self {
            self.entry(name, 0, 0, content, content.len() as u32, &[])
        }

        pub fn stored_with_local_extra(
            self,
            name: &str,
            content: &[u8],
            local_extra: &[u8],
        ) -> Self {
            self.entry(name, 0, 0, content, content.len() as u32, local_extra)
        }

        pub fn deflated(self, name: &str, content: &[u8]) -> Self {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(content).unwrap();
            let compressed = encoder.finish().unwrap();
            self.entry(name, 8, 0, &compressed, content.len() as u32, &[])
        }

        pub fn directory(self, name: &str) -> Self {
            self.entry(name, 0, 0, &[], 0, &[])
        }

        pub fn with_flags(self, name: &str, content: &[u8], flags: u16) -> Self {
            self.entry(name, 0, flags, content, content.len() as u32, &[])
        }

        /// Raw payload written as-is under an arbitrary method code.
        pub fn with_method(self, name: &str, payload: &[u8], method: u16) -> Self {
            self.entry(name, method, 0, payload, payload.len() as u32, &[])
        }

        fn entry(
            mut self,
            name: &str,
            method: u16,
            flags: u16,
            payload: &[u8],
            uncompressed_size: u32,
            local_extra: &[u8],
        ) -> Self {
            let lfh_offset = self.data.len() as u32;

            // Local file header
            self.data.extend_from_slice(b"PK\x03\x04");
            put_u16(&mut self.data, 20); // version needed
            put_u16(&mut self.data, flags);
            put_u16(&mut self.data, method);
            put_u16(&mut self.data, 0); // mod time
            put_u16(&mut self.data, 0); // mod date
            put_u32(&mut self.data, 0); // crc32 (unchecked by the reader)
            put_u32(&mut self.data, payload.len() as u32);
            put_u32(&mut self.data, uncompressed_size);
            put_u16(&mut self.data, name.len() as u16);
            put_u16(&mut self.data, local_extra.len() as u16);
            self.data.extend_from_slice(name.as_bytes());
            self.data.extend_from_slice(local_extra);
            self.data.extend_from_slice(payload);

            // Central directory file header
            self.central.extend_from_slice(b"PK\x01\x02");
            put_u16(&mut self.central, 20); // version made by
            put_u16(&mut self.central, 20); // version needed
            put_u16(&mut self.central, flags);
            put_u16(&mut self.central, method);
            put_u16(&mut self.central, 0); // mod time
            put_u16(&mut self.central, 0); // mod date
            put_u32(&mut self.central, 0); // crc32
            put_u32(&mut self.central, payload.len() as u32);
            put_u32(&mut self.central, uncompressed_size);
            put_u16(&mut self.central, name.len() as u16);
            put_u16(&mut self.central, 0); // extra field length
            put_u16(&mut self.central, 0); // comment length
            put_u16(&mut self.central, 0); // disk number start
            put_u16(&mut self.central, 0); // internal attrs
            put_u32(&mut self.central, 0); // external attrs
            put_u32(&mut self.central, lfh_offset);
            self.central.extend_from_slice(name.as_bytes());

            self.count += 1;
            self
        }

        pub fn finish(self) -> Vec<u8> {
            self.finish_with_comment(b"")
        }

        pub fn finish_with_comment(mut self, comment: &[u8]) -> Vec<u8> {
            let cd_offset = self.data.len() as u32;
            let cd_size = self.central.len() as u32;
            self.data.extend_from_slice(&self.central);

            self.data.extend_from_slice(b"PK\x05\x06");
            put_u16(&mut self.data, 0); // disk number
            put_u16(&mut self.data, 0); // disk with central directory
            put_u16(&mut self.data, self.count);
            put_u16(&mut self.data, self.count);
            put_u32(&mut self.data, cd_size);
            put_u32(&mut self.data, cd_offset);
            put_u16(&mut self.data, comment.len() as u16);
            self.data.extend_from_slice(comment);

            self.data
        }
    }

    fn put_u16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn put_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}
