//! Functions to extract an archive stored in a file on disk.

use std::path::Path;

use fs_err::File;

use crate::{ExtractError, ExtractOptions, FsOperation, OperationError};

/// Extracts the archive at `archive` into `destination`.
///
/// ```rust,no_run
/// # use std::path::Path;
/// use light_untar::fs::extract;
/// extract(Path::new("bundle/resources.tar"), Path::new("/tmp/resources")).unwrap();
/// ```
pub fn extract(archive: &Path, destination: &Path) -> Result<(), ExtractError> {
    extract_with_options(archive, destination, &ExtractOptions::default())
}

/// Extracts the archive at `archive` into `destination` using the given
/// options. The file is memory-mapped for the duration of the extraction.
pub fn extract_with_options(
    archive: &Path,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<(), ExtractError> {
    let read_error = |source| OperationError::Filesystem {
        operation: FsOperation::ReadArchive,
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(read_error)?;
    let (file, _) = file.into_parts();

    // SAFETY: the archive file must not be truncated or modified while it is
    // being extracted.
    let map = unsafe { memmap2::Mmap::map(&file) }
        .map_err(|err| {
            std::io::Error::new(
                err.kind(),
                format!("failed to map {}: {err}", archive.display()),
            )
        })
        .map_err(read_error)?;

    crate::extract_with_options(&map, destination, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RawArchive;
    use assert_matches::assert_matches;

    #[test]
    fn test_extract_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("bundle.tar");
        std::fs::write(
            &archive_path,
            RawArchive::new()
                .dir("docs/")
                .file("docs/readme.md", b"# readme")
                .finish(),
        )
        .unwrap();

        let destination = temp_dir.path().join("out");
        extract(&archive_path, &destination).unwrap();
        assert_eq!(
            std::fs::read_to_string(destination.join("docs/readme.md")).unwrap(),
            "# readme"
        );
    }

    #[test]
    fn test_missing_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("missing.tar");

        assert_matches!(
            extract(&archive_path, temp_dir.path()),
            Err(ExtractError::OperationFailed(OperationError::Filesystem {
                operation: FsOperation::ReadArchive,
                path,
                ..
            })) if path == archive_path
        );

        let err = extract(&archive_path, temp_dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "failed to read archive");
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains(&archive_path.display().to_string()));
    }

    #[test]
    fn test_empty_archive_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("empty.tar");
        std::fs::write(&archive_path, b"").unwrap();

        let destination = temp_dir.path().join("out");
        extract(&archive_path, &destination).unwrap();
        assert!(destination.is_dir());
    }
}
