use std::path::Path;

use crate::{
    DiskMaterializer, Entries, Entry, EntryKind, ExtractError, ExtractOptions, FsOperation,
    Materializer, OperationError,
};

/// Extracts the contents of an in-memory tar archive into `destination`.
///
/// Extraction stops at the first error. Files and directories created before
/// that point are left in place.
pub fn extract(archive: &[u8], destination: &Path) -> Result<(), ExtractError> {
    extract_with_options(archive, destination, &ExtractOptions::default())
}

/// Extracts the contents of an in-memory tar archive into `destination` using
/// the given options.
pub fn extract_with_options(
    archive: &[u8],
    destination: &Path,
    options: &ExtractOptions,
) -> Result<(), ExtractError> {
    extract_with(archive, destination, options, &mut DiskMaterializer)
}

/// Extracts the contents of an in-memory tar archive into `destination`,
/// performing all filesystem operations through `materializer`.
pub fn extract_with<M: Materializer + ?Sized>(
    archive: &[u8],
    destination: &Path,
    options: &ExtractOptions,
    materializer: &mut M,
) -> Result<(), ExtractError> {
    tracing::debug!(
        "extracting {} byte archive to {}",
        archive.len(),
        destination.display()
    );

    if options.create_destination {
        materializer
            .create_directory(destination, true)
            .map_err(|source| OperationError::Filesystem {
                operation: FsOperation::CreateDirectory,
                path: destination.to_path_buf(),
                source,
            })?;
    }

    let mut entries = Entries::new(archive, options);
    let mut materialized = 0usize;
    for entry in entries.by_ref() {
        if materialize_entry(&entry?, destination, materializer)? {
            materialized += 1;
        }
    }

    tracing::debug!(
        "extracted {materialized} entries to {}, scan ended at offset {}",
        destination.display(),
        entries.cursor()
    );

    Ok(())
}

/// Performs the filesystem operation for a single entry. Returns whether
/// anything was written.
fn materialize_entry<M: Materializer + ?Sized>(
    entry: &Entry<'_>,
    destination: &Path,
    materializer: &mut M,
) -> Result<bool, OperationError> {
    match entry.kind {
        EntryKind::File => {
            let name = entry.name.unwrap_or_default();
            let path = entry
                .relative_path()?
                .map(|relative| destination.join(relative))
                .ok_or_else(|| OperationError::InvalidPath {
                    name: name.to_owned(),
                })?;
            let contents = entry.contents().unwrap_or_default();

            let (operation, result) = if contents.is_empty() {
                (
                    FsOperation::WriteEmptyFile,
                    materializer.write_empty_file(&path),
                )
            } else {
                (
                    FsOperation::CreateFile,
                    materializer.create_file(&path, contents),
                )
            };
            result.map_err(|source| OperationError::Filesystem {
                operation,
                path: path.clone(),
                source,
            })?;

            tracing::debug!("extracted {} ({} bytes)", path.display(), contents.len());
            Ok(true)
        }
        EntryKind::Directory => {
            let Some(relative) = entry.relative_path()? else {
                tracing::trace!("skipping directory entry at offset {}", entry.offset);
                return Ok(false);
            };
            let path = destination.join(relative);
            materializer
                .create_directory(&path, true)
                .map_err(|source| OperationError::Filesystem {
                    operation: FsOperation::CreateDirectory,
                    path: path.clone(),
                    source,
                })?;

            tracing::debug!("created directory {}", path.display());
            Ok(true)
        }
        EntryKind::NullBlock | EntryKind::ExtendedHeader | EntryKind::Other(_) => {
            tracing::trace!(
                "skipping {:?} entry at offset {} ({} blocks)",
                entry.kind,
                entry.offset,
                entry.block_count
            );
            Ok(false)
        }
    }
}
