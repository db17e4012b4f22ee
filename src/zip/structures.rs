use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::PipelineError;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
///
/// Only the fields this reader consumes are retained: the total entry
/// count and the offset where the central directory begins.
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self, PipelineError> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(PipelineError::MalformedArchive(
                "invalid end of central directory record".into(),
            ));
        }

        let mut cursor = Cursor::new(&data[4..]);
        let _disk_number = read_u16(&mut cursor)?;
        let _disk_with_cd = read_u16(&mut cursor)?;
        let _disk_entries = read_u16(&mut cursor)?;
        let total_entries = read_u16(&mut cursor)?;
        let _cd_size = read_u32(&mut cursor)?;
        let cd_offset = read_u32(&mut cursor)?;

        Ok(Self {
            total_entries,
            cd_offset,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// General-purpose bit flag 3: sizes deferred to a trailing data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

/// Parsed archive entry information.
///
/// `data_offset` is already resolved against the entry's Local File Header,
/// so it points at the first byte of the (possibly compressed) payload.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub data_offset: u64,
    pub is_directory: bool,
}

impl EntryDescriptor {
    /// Final path component of the entry name, `None` when there is none
    /// (trailing slash or empty name).
    pub fn base_name(&self) -> Option<&str> {
        match self.file_name.rsplit('/').next() {
            Some("") | None => None,
            Some(base) => Some(base),
        }
    }
}

/// Read a little-endian u16, mapping short reads to a structural error.
pub(crate) fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, PipelineError> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| PipelineError::MalformedArchive("truncated record".into()))
}

/// Read a little-endian u32, mapping short reads to a structural error.
pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, PipelineError> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| PipelineError::MalformedArchive("truncated record".into()))
}
