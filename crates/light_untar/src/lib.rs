#![deny(missing_docs)]

//! This crate extracts uncompressed USTAR archives that are fully held in
//! memory into a directory on disk.
//!
//! The archive is scanned one 512-byte block at a time. Regular files and
//! directories are materialized, null blocks and other recognized tar entry
//! types are skipped, and anything else aborts the extraction.
//!
//! ```rust,no_run
//! # use std::path::Path;
//! let archive = std::fs::read("resources.tar").unwrap();
//! light_untar::extract(&archive, Path::new("/tmp/resources")).unwrap();
//! ```

use std::path::PathBuf;

pub mod entry;
pub mod fs;
pub mod header;
pub mod materialize;
pub mod read;

mod extract;
mod options;
#[cfg(test)]
mod test_utils;

pub use entry::{entries, Entries, Entry, EntryKind};
pub use extract::{extract, extract_with, extract_with_options};
pub use materialize::{DiskMaterializer, Materializer};
pub use options::{ExtendedHeaderPolicy, ExtractOptions, SizeFieldParsing};

/// The size of a single tar block in bytes.
pub const BLOCK_SIZE: usize = 512;

/// An error that can occur when extracting an archive.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// A block carries a type marker that is not a known tar entry type.
    #[error("invalid block type {} found at offset {offset}", .type_marker.escape_ascii())]
    CorruptBlock {
        /// The offending type marker.
        type_marker: u8,
        /// The offset of the header block within the archive.
        offset: usize,
    },

    /// Decoding a header field or a filesystem operation failed.
    #[error(transparent)]
    OperationFailed(#[from] OperationError),
}

/// The filesystem operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FsOperation {
    CreateDirectory,
    CreateFile,
    WriteEmptyFile,
    ReadArchive,
}

impl std::fmt::Display for FsOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FsOperation::CreateDirectory => "create directory",
            FsOperation::CreateFile => "create file",
            FsOperation::WriteEmptyFile => "write empty file",
            FsOperation::ReadArchive => "read archive",
        })
    }
}

/// An error caused by undecodable header fields or by the environment.
#[derive(thiserror::Error, Debug)]
pub enum OperationError {
    /// The name field is not valid UTF-8.
    #[error("bad name in header at offset {offset}")]
    InvalidName {
        /// The offset of the header block.
        offset: usize,
    },

    /// The size field is not a valid octal number.
    #[error("bad size {field:?} in header at offset {offset}")]
    InvalidSize {
        /// The offset of the header block.
        offset: usize,
        /// The raw contents of the size field, lossily decoded.
        field: String,
    },

    /// The archive ends before a header or its content does.
    #[error("archive is truncated at offset {offset}: {needed} bytes needed but only {available} available")]
    Truncated {
        /// The offset at which the read started.
        offset: usize,
        /// The number of bytes that were requested.
        needed: u64,
        /// The number of bytes left in the archive.
        available: usize,
    },

    /// The entry name cannot be placed below the destination.
    #[error("entry name {name:?} does not resolve to a path inside the destination")]
    InvalidPath {
        /// The entry name as found in the archive.
        name: String,
    },

    /// Reading the archive from a stream failed.
    #[error("failed to read the archive")]
    ReadArchive(#[source] std::io::Error),

    /// A filesystem operation failed. The path is only part of the message of
    /// the underlying error.
    #[error("failed to {operation}")]
    Filesystem {
        /// What was being attempted.
        operation: FsOperation,
        /// The path the operation was targeting.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
