//! Helpers to assemble tar archives byte by byte, including archives that a
//! well-behaved encoder refuses to produce.

use crate::header::{NAME_LEN, NAME_OFFSET, SIZE_OFFSET, TYPE_OFFSET};
use crate::BLOCK_SIZE;

/// Builds a single header block. Only the fields the scanner reads are set.
pub fn raw_header(name: &[u8], type_marker: u8, size: u64) -> Vec<u8> {
    let mut header = vec![0u8; BLOCK_SIZE];

    let name_len = name.len().min(NAME_LEN);
    header[NAME_OFFSET..NAME_OFFSET + name_len].copy_from_slice(&name[..name_len]);

    let size_str = format!("{size:011o}\0");
    header[SIZE_OFFSET..SIZE_OFFSET + 12].copy_from_slice(size_str.as_bytes());

    header[TYPE_OFFSET] = type_marker;
    header[257..262].copy_from_slice(b"ustar");
    header
}

/// Incrementally builds an archive out of raw header blocks and payloads.
#[derive(Default)]
pub struct RawArchive {
    bytes: Vec<u8>,
}

impl RawArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry with the given payload, padded to a block boundary.
    pub fn entry(mut self, name: &[u8], type_marker: u8, payload: &[u8]) -> Self {
        self.bytes
            .extend(raw_header(name, type_marker, payload.len() as u64));
        self.payload(payload)
    }

    /// Appends a header that declares `size` bytes but carries no payload.
    pub fn header_only(mut self, name: &[u8], type_marker: u8, size: u64) -> Self {
        self.bytes.extend(raw_header(name, type_marker, size));
        self
    }

    /// Appends raw payload bytes, padded to a block boundary.
    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(payload);
        let padding = (BLOCK_SIZE - (payload.len() % BLOCK_SIZE)) % BLOCK_SIZE;
        self.bytes.extend(std::iter::repeat_n(0u8, padding));
        self
    }

    pub fn file(self, name: &str, contents: &[u8]) -> Self {
        self.entry(name.as_bytes(), b'0', contents)
    }

    pub fn dir(self, name: &str) -> Self {
        self.entry(name.as_bytes(), b'5', &[])
    }

    /// Appends the two zero blocks that end a tar stream.
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&[0u8; 2 * BLOCK_SIZE]);
        self.bytes
    }

    /// Returns the bytes without an end-of-archive marker.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
