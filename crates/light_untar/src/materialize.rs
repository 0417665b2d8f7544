//! The boundary between the archive scanner and the filesystem.

use std::io::Write;
use std::path::Path;

use fs_err as fs;

/// Creates the directories and files described by an archive.
///
/// The extractor makes exactly one call per entry and never retries. It does
/// not check whether a target already exists.
pub trait Materializer {
    /// Creates a directory. When `create_intermediates` is set, missing parent
    /// directories are created and an already existing directory is not an
    /// error.
    fn create_directory(&mut self, path: &Path, create_intermediates: bool)
        -> std::io::Result<()>;

    /// Creates a file with the given contents, replacing any existing file.
    fn create_file(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()>;

    /// Creates an empty file, replacing any existing file.
    fn write_empty_file(&mut self, path: &Path) -> std::io::Result<()>;
}

/// A [`Materializer`] that writes to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskMaterializer;

impl Materializer for DiskMaterializer {
    fn create_directory(
        &mut self,
        path: &Path,
        create_intermediates: bool,
    ) -> std::io::Result<()> {
        if create_intermediates {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    fn create_file(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        fs::write(path, contents)
    }

    fn write_empty_file(&mut self, path: &Path) -> std::io::Result<()> {
        // Write atomically via a temporary file next to the target.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".light-untar");

        // Temporary files are owner-only by default. Request the same mode a
        // plain file creation would get, the umask still applies.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let mut temp = builder
            .tempfile_in(dir)
            .map_err(|err| {
                std::io::Error::new(
                    err.kind(),
                    format!(
                        "failed to create temporary file for {}: {err}",
                        path.display()
                    ),
                )
            })?;
        temp.flush()?;
        temp.persist(path).map_err(|err| {
            std::io::Error::new(
                err.error.kind(),
                format!("failed to persist {}: {}", path.display(), err.error),
            )
        })?;
        Ok(())
    }
}
