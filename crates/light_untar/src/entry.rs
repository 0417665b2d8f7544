//! Sequential scanning of an archive, one entry at a time.

use std::iter::FusedIterator;
use std::ops::Range;
use std::path::{Component, Path, PathBuf};

use crate::{
    header, ExtendedHeaderPolicy, ExtractError, ExtractOptions, OperationError, SizeFieldParsing,
    BLOCK_SIZE,
};

/// The kind of an entry, derived from the type marker of its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (`'0'`).
    File,
    /// A directory (`'5'`).
    Directory,
    /// A PAX extended header (`'x'`).
    ExtendedHeader,
    /// A zero-filled padding block (`'\0'`).
    NullBlock,
    /// Any other recognized tar entry type (`'g'` and `'1'` through `'7'`
    /// except `'5'`). Carries the type marker.
    Other(u8),
}

impl EntryKind {
    /// Classifies a type marker. Returns `None` for markers that are not part
    /// of the tar format.
    pub fn from_type_marker(type_marker: u8) -> Option<Self> {
        match type_marker {
            b'0' => Some(EntryKind::File),
            b'5' => Some(EntryKind::Directory),
            b'x' => Some(EntryKind::ExtendedHeader),
            b'\0' => Some(EntryKind::NullBlock),
            b'g' | b'1'..=b'7' => Some(EntryKind::Other(type_marker)),
            _ => None,
        }
    }
}

/// A single decoded entry of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// The offset of the header block within the archive.
    pub offset: usize,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// The name of the entry. Only decoded for files and directories.
    pub name: Option<&'a str>,

    /// The payload size declared by the header, or zero if it was not decoded.
    pub size: u64,

    /// The range of the archive that holds the file contents. Only set for
    /// files.
    pub content_range: Option<Range<usize>>,

    /// The number of blocks the entry occupies, including its header.
    pub block_count: u64,

    archive: &'a [u8],
}

impl<'a> Entry<'a> {
    /// Returns the contents of a file entry.
    pub fn contents(&self) -> Option<&'a [u8]> {
        let archive = self.archive;
        self.content_range.clone().map(|range| &archive[range])
    }

    /// Returns the path of this entry relative to the destination, or `None`
    /// if the entry has no name or the name refers to the destination itself.
    pub fn relative_path(&self) -> Result<Option<PathBuf>, OperationError> {
        self.name.map_or(Ok(None), normalize_name)
    }
}

/// Normalizes an entry name by stripping root and `.` components. Returns
/// `None` if nothing is left, and an error if the name contains `..`.
pub fn normalize_name(name: &str) -> Result<Option<PathBuf>, OperationError> {
    let path = Path::new(name);
    let mut result = PathBuf::with_capacity(name.len());
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                return Err(OperationError::InvalidPath {
                    name: name.to_owned(),
                })
            }
            Component::Normal(part) => result.push(part),
        }
    }

    if result.as_os_str().is_empty() {
        return Ok(None);
    }

    Ok(Some(result))
}

/// Returns the number of blocks occupied by a header followed by `size` bytes
/// of payload padded to a block boundary.
pub fn block_count(size: u64) -> u64 {
    1 + size.div_ceil(BLOCK_SIZE as u64)
}

/// An iterator over the entries of an in-memory archive.
///
/// Iteration ends once the cursor reaches the end of the archive. After an
/// error the iterator yields nothing more and the cursor stays at the header
/// that caused it.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    archive: &'a [u8],
    cursor: usize,
    extended_headers: ExtendedHeaderPolicy,
    size_parsing: SizeFieldParsing,
    failed: bool,
}

/// Returns an iterator over the entries of `archive` using default options.
pub fn entries(archive: &[u8]) -> Entries<'_> {
    Entries::new(archive, &ExtractOptions::default())
}

impl<'a> Entries<'a> {
    /// Constructs a new iterator that starts at the beginning of `archive`.
    pub fn new(archive: &'a [u8], options: &ExtractOptions) -> Self {
        Self {
            archive,
            cursor: 0,
            extended_headers: options.extended_headers,
            size_parsing: options.size_parsing,
            failed: false,
        }
    }

    /// The offset of the next header that will be read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn read_entry(&self, offset: usize) -> Result<Entry<'a>, ExtractError> {
        let type_marker = header::type_marker(self.archive, offset)?;
        let kind = EntryKind::from_type_marker(type_marker).ok_or(ExtractError::CorruptBlock {
            type_marker,
            offset,
        })?;

        let mut name = None;
        let mut size = 0;
        let mut content_range = None;
        let block_count = match kind {
            EntryKind::File => {
                name = Some(header::name(self.archive, offset)?);
                size = header::size(self.archive, offset, self.size_parsing)?;
                content_range = Some(self.content_range(offset, size)?);
                block_count(size)
            }
            EntryKind::Directory => {
                name = Some(header::name(self.archive, offset)?);
                1
            }
            EntryKind::NullBlock => 1,
            EntryKind::ExtendedHeader => match self.extended_headers {
                ExtendedHeaderPolicy::HonorSize => {
                    size = header::size(self.archive, offset, self.size_parsing)?;
                    block_count(size)
                }
                ExtendedHeaderPolicy::SingleBlock => 2,
            },
            EntryKind::Other(_) => {
                size = header::size(self.archive, offset, self.size_parsing)?;
                block_count(size)
            }
        };

        Ok(Entry {
            offset,
            kind,
            name,
            size,
            content_range,
            block_count,
            archive: self.archive,
        })
    }

    fn content_range(&self, offset: usize, size: u64) -> Result<Range<usize>, OperationError> {
        let start = offset + BLOCK_SIZE;
        let available = self.archive.len().saturating_sub(start);
        match usize::try_from(size) {
            Ok(len) if len <= available => Ok(start..start + len),
            _ => Err(OperationError::Truncated {
                offset: start,
                needed: size,
                available,
            }),
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.archive.len() {
            return None;
        }

        match self.read_entry(self.cursor) {
            Ok(entry) => {
                let advance = entry
                    .block_count
                    .checked_mul(BLOCK_SIZE as u64)
                    .and_then(|bytes| usize::try_from(bytes).ok())
                    .unwrap_or(usize::MAX);
                self.cursor = self.cursor.saturating_add(advance);
                Some(Ok(entry))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Entries<'_> {}
