//! Decoding of the fields of a tar header block.
//!
//! Every function takes the whole archive and the offset of a header block and
//! reads a fixed byte range relative to that offset. Nothing is overlaid on the
//! raw bytes, so alignment and endianness never come into play.

use crate::{OperationError, SizeFieldParsing, BLOCK_SIZE};

/// Offset of the name field within a header block.
pub const NAME_OFFSET: usize = 0;

/// Length of the name field.
pub const NAME_LEN: usize = 100;

/// Offset of the size field within a header block.
pub const SIZE_OFFSET: usize = 124;

/// Length of the size field.
pub const SIZE_LEN: usize = 12;

/// Offset of the type marker within a header block.
pub const TYPE_OFFSET: usize = 156;

/// Returns the header block that starts at `offset`.
pub fn header(archive: &[u8], offset: usize) -> Result<&[u8], OperationError> {
    offset
        .checked_add(BLOCK_SIZE)
        .and_then(|end| archive.get(offset..end))
        .ok_or(OperationError::Truncated {
            offset,
            needed: BLOCK_SIZE as u64,
            available: archive.len().saturating_sub(offset),
        })
}

/// Returns the type marker of the header at `offset`. Any byte value is passed
/// through unchanged.
pub fn type_marker(archive: &[u8], offset: usize) -> Result<u8, OperationError> {
    Ok(header(archive, offset)?[TYPE_OFFSET])
}

/// Returns the name of the header at `offset`.
///
/// The name ends at the first NUL byte of the 100-byte field, or spans the
/// whole field if there is none.
pub fn name(archive: &[u8], offset: usize) -> Result<&str, OperationError> {
    let field = &header(archive, offset)?[NAME_OFFSET..NAME_OFFSET + NAME_LEN];
    let len = field.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    std::str::from_utf8(&field[..len]).map_err(|_| OperationError::InvalidName { offset })
}

/// Returns the payload size of the header at `offset`.
pub fn size(
    archive: &[u8],
    offset: usize,
    parsing: SizeFieldParsing,
) -> Result<u64, OperationError> {
    let field = &header(archive, offset)?[SIZE_OFFSET..SIZE_OFFSET + SIZE_LEN];
    let invalid = || OperationError::InvalidSize {
        offset,
        field: String::from_utf8_lossy(field).into_owned(),
    };
    if !field.is_ascii() {
        return Err(invalid());
    }
    parse_octal(field, parsing).ok_or_else(invalid)
}

/// Parses an ASCII octal field. Returns `None` if the field is malformed for
/// the given parsing mode or the value does not fit in a `u64`.
pub fn parse_octal(field: &[u8], parsing: SizeFieldParsing) -> Option<u64> {
    let digits = match parsing {
        SizeFieldParsing::Strict => {
            let start = field.iter().position(|&b| b != b' ').unwrap_or(field.len());
            let rest = &field[start..];
            let (digits, padding) = rest.split_at(octal_prefix_len(rest));
            if !padding.iter().all(|&b| b == 0 || b == b' ') {
                return None;
            }
            digits
        }
        SizeFieldParsing::Lenient => {
            let start = field
                .iter()
                .position(|&b| !(b.is_ascii_whitespace() || b == 0x0b))
                .unwrap_or(field.len());
            let mut rest = &field[start..];
            if let [b'+', tail @ ..] = rest {
                rest = tail;
            }
            &rest[..octal_prefix_len(rest)]
        }
    };

    digits.iter().try_fold(0u64, |value, &digit| {
        value.checked_mul(8)?.checked_add(u64::from(digit - b'0'))
    })
}

fn octal_prefix_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|b| !matches!(b, b'0'..=b'7'))
        .unwrap_or(bytes.len())
}
