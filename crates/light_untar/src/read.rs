//! Functions that extract an archive from objects that implement the
//! [`std::io::Read`] trait.

use std::io::Read;
use std::path::Path;

use crate::{ExtractError, ExtractOptions, OperationError};

/// Reads the whole archive from `reader` into memory and extracts it into
/// `destination`.
pub fn extract(reader: impl Read, destination: &Path) -> Result<(), ExtractError> {
    extract_with_options(reader, destination, &ExtractOptions::default())
}

/// Reads the whole archive from `reader` into memory and extracts it into
/// `destination` using the given options.
pub fn extract_with_options(
    mut reader: impl Read,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<(), ExtractError> {
    let mut archive = Vec::new();
    reader
        .read_to_end(&mut archive)
        .map_err(OperationError::ReadArchive)?;
    crate::extract_with_options(&archive, destination, options)
}
