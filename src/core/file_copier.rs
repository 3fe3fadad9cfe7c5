use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * This module implements the file-system half of the copy workflow: locating
 * the selected source file, emptying the target directory, and copying the file
 * into it under its original name. The operations are separate so the caller can
 * report progress between them and abort after the first failure. A trait
 * `FileCopierOperations` abstracts them for testing; `CoreFileCopier` is the
 * concrete implementation.
 */

#[derive(Debug)]
pub enum CopyError {
    SourceFileNotFound(PathBuf),
    ClearTarget { path: PathBuf, source: io::Error },
    Copy { from: PathBuf, to: PathBuf, source: io::Error },
    Io(io::Error),
}

impl From<io::Error> for CopyError {
    fn from(err: io::Error) -> Self {
        CopyError::Io(err)
    }
}

impl std::fmt::Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyError::SourceFileNotFound(p) => {
                write!(f, "Source file not found: {}", p.display())
            }
            CopyError::ClearTarget { path, source } => {
                write!(f, "Could not remove {}: {source}", path.display())
            }
            CopyError::Copy { from, to, source } => write!(
                f,
                "Could not copy {} to {}: {source}",
                from.display(),
                to.display()
            ),
            CopyError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CopyError::SourceFileNotFound(_) => None,
            CopyError::ClearTarget { source, .. } => Some(source),
            CopyError::Copy { source, .. } => Some(source),
            CopyError::Io(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CopyError>;

/*
 * Summary of a completed copy, used for the completion dialog and logging.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub bytes_copied: u64,
    pub removed_entries: usize,
}

pub trait FileCopierOperations: Send + Sync {
    /*
     * Resolves `file_name` inside `source_directory` and checks that it is still
     * an existing file.
     */
    fn locate_source(&self, source_directory: &Path, file_name: &str) -> Result<PathBuf>;

    /*
     * Ensures `target_directory` exists and is empty. Returns the number of
     * entries that were removed.
     */
    fn clear_target(&self, target_directory: &Path) -> Result<usize>;

    /*
     * Copies `source_path` into `target_directory` under the same file name,
     * overwriting an existing file of that name.
     */
    fn copy_into_target(&self, source_path: &Path, target_directory: &Path)
    -> Result<CopyReport>;
}

pub struct CoreFileCopier {}

impl CoreFileCopier {
    pub fn new() -> Self {
        CoreFileCopier {}
    }
}

impl Default for CoreFileCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl FileCopierOperations for CoreFileCopier {
    fn locate_source(&self, source_directory: &Path, file_name: &str) -> Result<PathBuf> {
        let source_path = source_directory.join(file_name);
        if source_path.is_file() {
            Ok(source_path)
        } else {
            log::debug!("FileCopier: Source file {source_path:?} is missing.");
            Err(CopyError::SourceFileNotFound(source_path))
        }
    }

    fn clear_target(&self, target_directory: &Path) -> Result<usize> {
        if !target_directory.exists() {
            log::info!("FileCopier: Creating target directory {target_directory:?}.");
            fs::create_dir_all(target_directory)?;
            return Ok(0);
        }

        let mut removed = 0;
        for entry_result in WalkDir::new(target_directory).min_depth(1).max_depth(1) {
            let entry = entry_result.map_err(io::Error::from)?;
            let path = entry.path();
            // file_type() does not follow links, so a symlinked directory is unlinked, not emptied.
            let removal = if entry.file_type().is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            removal.map_err(|source| CopyError::ClearTarget {
                path: path.to_path_buf(),
                source,
            })?;
            log::trace!("FileCopier: Removed {path:?}.");
            removed += 1;
        }
        log::debug!("FileCopier: Cleared {removed} entries from {target_directory:?}.");
        Ok(removed)
    }

    fn copy_into_target(
        &self,
        source_path: &Path,
        target_directory: &Path,
    ) -> Result<CopyReport> {
        let file_name = source_path
            .file_name()
            .ok_or_else(|| CopyError::SourceFileNotFound(source_path.to_path_buf()))?;
        let target_path = target_directory.join(file_name);

        let bytes_copied =
            fs::copy(source_path, &target_path).map_err(|source| CopyError::Copy {
                from: source_path.to_path_buf(),
                to: target_path.clone(),
                source,
            })?;
        log::info!("FileCopier: Copied {bytes_copied} bytes from {source_path:?} to {target_path:?}.");

        Ok(CopyReport {
            source_path: source_path.to_path_buf(),
            target_path,
            bytes_copied,
            removed_entries: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn entry_names(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_locate_source_existing_and_missing() -> Result<()> {
        // Arrange
        let dir = tempdir()?;
        fs::write(dir.path().join("Alpha.txt"), "alpha")?;
        let copier = CoreFileCopier::new();

        // Act & Assert
        assert_eq!(
            copier.locate_source(dir.path(), "Alpha.txt")?,
            dir.path().join("Alpha.txt")
        );
        match copier.locate_source(dir.path(), "gone.txt") {
            Err(CopyError::SourceFileNotFound(p)) => assert_eq!(p, dir.path().join("gone.txt")),
            other => panic!("Expected SourceFileNotFound, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_locate_source_rejects_directories() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("folder"))?;
        let copier = CoreFileCopier::new();

        assert!(matches!(
            copier.locate_source(dir.path(), "folder"),
            Err(CopyError::SourceFileNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_clear_target_removes_files_and_subdirectories() -> Result<()> {
        // Arrange
        let dir = tempdir()?;
        fs::write(dir.path().join("old.dat"), "old")?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("inner.dat"), "inner")?;
        let copier = CoreFileCopier::new();

        // Act
        let removed = copier.clear_target(dir.path())?;

        // Assert
        assert_eq!(removed, 2);
        assert!(dir.path().exists(), "The target directory itself must remain");
        assert!(entry_names(dir.path()).is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_target_creates_missing_directory() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("target").join("deeper");
        let copier = CoreFileCopier::new();

        let removed = copier.clear_target(&target)?;

        assert_eq!(removed, 0);
        assert!(target.is_dir());
        Ok(())
    }

    #[test]
    fn test_clear_then_copy_leaves_only_selected_file() -> Result<()> {
        // Arrange
        let source_dir = tempdir()?;
        let target_dir = tempdir()?;
        fs::write(source_dir.path().join("Alpha.txt"), "alpha contents")?;
        fs::write(target_dir.path().join("old.dat"), "stale")?;
        let copier = CoreFileCopier::new();

        // Act
        let source_path = copier.locate_source(source_dir.path(), "Alpha.txt")?;
        copier.clear_target(target_dir.path())?;
        let report = copier.copy_into_target(&source_path, target_dir.path())?;

        // Assert
        assert_eq!(
            entry_names(target_dir.path()),
            BTreeSet::from(["Alpha.txt".to_string()])
        );
        assert_eq!(report.target_path, target_dir.path().join("Alpha.txt"));
        assert_eq!(report.bytes_copied, "alpha contents".len() as u64);
        assert_eq!(
            fs::read_to_string(target_dir.path().join("Alpha.txt"))?,
            "alpha contents"
        );
        assert!(
            source_path.exists(),
            "The source file must be copied, not moved"
        );
        Ok(())
    }

    #[test]
    fn test_copy_into_target_overwrites_existing_file() -> Result<()> {
        let source_dir = tempdir()?;
        let target_dir = tempdir()?;
        fs::write(source_dir.path().join("same.txt"), "new")?;
        fs::write(target_dir.path().join("same.txt"), "old and longer")?;
        let copier = CoreFileCopier::new();

        copier.copy_into_target(&source_dir.path().join("same.txt"), target_dir.path())?;

        assert_eq!(fs::read_to_string(target_dir.path().join("same.txt"))?, "new");
        Ok(())
    }

    #[test]
    fn test_copy_into_missing_target_reports_copy_error() {
        let source_dir = tempdir().unwrap();
        fs::write(source_dir.path().join("a.txt"), "a").unwrap();
        let missing_target = source_dir.path().join("no_such_dir");
        let copier = CoreFileCopier::new();

        match copier.copy_into_target(&source_dir.path().join("a.txt"), &missing_target) {
            Err(CopyError::Copy { to, .. }) => assert_eq!(to, missing_target.join("a.txt")),
            other => panic!("Expected CopyError::Copy, got {other:?}"),
        }
    }
}
