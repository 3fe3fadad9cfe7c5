use crate::core::path_utils;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * This module provides the filename search over the source directory: a
 * non-recursive listing of the directory, filtered by a case-insensitive
 * substring match and sorted case-insensitively. It defines the errors the
 * search can report, a trait `FileSearcherOperations` for abstracting the
 * search, and the concrete implementation `CoreFileSearcher`.
 */

#[derive(Debug)]
pub enum SearchError {
    SourceDirectoryNotFound(PathBuf),
    Io(io::Error),
}

impl From<io::Error> for SearchError {
    fn from(err: io::Error) -> Self {
        SearchError::Io(err)
    }
}

impl From<walkdir::Error> for SearchError {
    fn from(err: walkdir::Error) -> Self {
        SearchError::Io(io::Error::from(err))
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::SourceDirectoryNotFound(p) => {
                write!(f, "Source directory not found: {}", p.display())
            }
            SearchError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Io(e) => Some(e),
            SearchError::SourceDirectoryNotFound(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/*
 * Defines the filename search over a single directory.
 * Implementations list the immediate files of `source_directory` and return the
 * names containing `query` (case-insensitive), ordered case-insensitively.
 * The search never modifies the file system.
 */
pub trait FileSearcherOperations: Send + Sync {
    fn search(&self, query: &str, source_directory: &Path) -> Result<Vec<String>>;
}

pub struct CoreFileSearcher {}

impl CoreFileSearcher {
    pub fn new() -> Self {
        CoreFileSearcher {}
    }
}

impl Default for CoreFileSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSearcherOperations for CoreFileSearcher {
    fn search(&self, query: &str, source_directory: &Path) -> Result<Vec<String>> {
        if !source_directory.is_dir() {
            log::debug!("FileSearcher: Source directory {source_directory:?} does not exist.");
            return Err(SearchError::SourceDirectoryNotFound(
                source_directory.to_path_buf(),
            ));
        }

        let needle = query.to_lowercase();
        let mut matches = Vec::new();

        // Depth 1 only: the entries directly inside the directory, not the directory itself.
        for entry_result in WalkDir::new(source_directory)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry_result?;
            let file_type = entry.file_type();
            // Symlinks count when they resolve to a regular file; dangling ones are skipped.
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            let Some(name) = path_utils::file_name_string(entry.path()) else {
                log::warn!(
                    "FileSearcher: Skipping {:?}, its name is not valid Unicode.",
                    entry.path()
                );
                continue;
            };
            if name.to_lowercase().contains(&needle) {
                matches.push(name);
            }
        }

        sort_file_names(&mut matches);
        log::debug!(
            "FileSearcher: Query '{query}' matched {} file(s) in {source_directory:?}.",
            matches.len()
        );
        Ok(matches)
    }
}

/*
 * Case-insensitive ascending order. Names that differ only in case are ordered
 * ordinally so the result never depends on directory enumeration order.
 */
pub fn compare_file_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_file_names(names: &mut Vec<String>) {
    names.sort_by(|a, b| compare_file_names(a, b));
    names.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_files(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), name.as_bytes()).unwrap();
        }
    }

    #[test]
    fn test_search_is_case_insensitive_and_sorted() -> Result<()> {
        // Arrange
        let dir = tempdir()?;
        create_files(dir.path(), &["Alpha.txt", "beta.csv", "ALPHA2.txt"]);
        let searcher = CoreFileSearcher::new();

        // Act
        let results = searcher.search("alpha", dir.path())?;

        // Assert
        assert_eq!(results, vec!["Alpha.txt".to_string(), "ALPHA2.txt".to_string()]);
        Ok(())
    }

    #[test]
    fn test_search_uppercase_query_matches_lowercase_names() -> Result<()> {
        let dir = tempdir()?;
        create_files(dir.path(), &["invoice_0042.pdf", "INVOICE_0043.PDF", "notes.md"]);
        let searcher = CoreFileSearcher::new();

        let results = searcher.search("INVOICE", dir.path())?;

        assert_eq!(
            results,
            vec!["invoice_0042.pdf".to_string(), "INVOICE_0043.PDF".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_search_skips_subdirectories_and_their_contents() -> Result<()> {
        // Arrange
        let dir = tempdir()?;
        let nested = dir.path().join("matching_folder");
        fs::create_dir(&nested)?;
        create_files(&nested, &["matching_nested.txt"]);
        create_files(dir.path(), &["matching_top.txt"]);
        let searcher = CoreFileSearcher::new();

        // Act
        let results = searcher.search("matching", dir.path())?;

        // Assert
        assert_eq!(results, vec!["matching_top.txt".to_string()]);
        Ok(())
    }

    #[test]
    fn test_search_no_matches_returns_empty() -> Result<()> {
        let dir = tempdir()?;
        create_files(dir.path(), &["one.txt", "two.txt"]);
        let searcher = CoreFileSearcher::new();

        assert!(searcher.search("three", dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_search_missing_directory_reports_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does_not_exist");
        let searcher = CoreFileSearcher::new();

        match searcher.search("anything", &missing) {
            Err(SearchError::SourceDirectoryNotFound(p)) => assert_eq!(p, missing),
            other => panic!("Expected SourceDirectoryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_search_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        create_files(dir.path(), &["report_b.txt", "Report_a.txt", "REPORT_c.txt"]);
        let searcher = CoreFileSearcher::new();

        let first = searcher.search("report", dir.path())?;
        let second = searcher.search("report", dir.path())?;

        assert_eq!(first, second);
        assert_eq!(first, vec!["Report_a.txt", "report_b.txt", "REPORT_c.txt"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_search_skips_names_that_are_not_unicode() -> Result<()> {
        use crate::core::file_copier::{CoreFileCopier, FileCopierOperations};
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // Arrange
        let dir = tempdir()?;
        let raw_name = OsStr::from_bytes(b"report_\xff1.txt");
        if fs::write(dir.path().join(raw_name), b"raw").is_err() {
            // Some file systems refuse non-UTF-8 names outright.
            return Ok(());
        }
        create_files(dir.path(), &["report_2.txt"]);
        let searcher = CoreFileSearcher::new();

        // Act
        let results = searcher.search("report", dir.path())?;

        // Assert
        assert_eq!(results, vec!["report_2.txt".to_string()]);
        for name in &results {
            assert!(
                CoreFileCopier::new().locate_source(dir.path(), name).is_ok(),
                "Every listed name must be locatable: {name}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_compare_file_names_orders_case_insensitively_with_ordinal_tiebreak() {
        let mut names = vec![
            "b.txt".to_string(),
            "A.txt".to_string(),
            "a.txt".to_string(),
            "C.txt".to_string(),
            "a.txt".to_string(),
        ];
        sort_file_names(&mut names);
        assert_eq!(names, vec!["A.txt", "a.txt", "b.txt", "C.txt"]);
    }

    #[test]
    fn test_search_error_display_is_verbatim_for_io() {
        let err = SearchError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        assert_eq!(err.to_string(), "access denied");
    }
}
