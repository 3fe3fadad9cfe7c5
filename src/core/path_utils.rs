/*
 * This module provides utility functions for path manipulation, focusing on
 * retrieving and ensuring the existence of application-specific directories
 * and on the small filename helpers shared by search and copy.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/*
 * Retrieves the application's primary local configuration directory.
 * This function determines the platform-specific path for local (non-roaming)
 * application configuration data and creates it if necessary. No organization
 * qualifier is used, so the directory sits directly under the user's local
 * application data directory (e.g. AppData/Local on Windows, ~/.config on Linux).
 *
 * Returns `None` if the directory could not be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Returns the path of the diagnostic log file. The log lives in the system temp
 * directory so that a read-only install location never prevents logging.
 */
pub fn log_file_path(app_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}.log", app_name.to_lowercase()))
}

/*
 * Extracts the final path component as an owned UTF-8 string.
 * Returns `None` for names that are not valid Unicode: a lossy rendering could
 * not be joined back into a path that exists.
 */
pub fn file_name_string(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_get_base_app_config_local_dir_creates_if_not_exists() {
        // Arrange
        let unique_app_name = format!("TestApp_PathUtils_Create_{}", rand::random::<u128>());
        if let Some(proj_dirs) = ProjectDirs::from("", "", &unique_app_name) {
            let path_to_check = proj_dirs.config_local_dir();
            if path_to_check.exists() {
                fs::remove_dir_all(path_to_check)
                    .expect("Pre-test cleanup failed for newly generated unique_app_name path");
            }
        }

        // Act
        let path_opt = get_base_app_config_local_dir(&unique_app_name);

        // Assert
        match path_opt {
            Some(path) => {
                assert!(path.exists(), "Config directory should have been created");
                assert!(
                    path.to_string_lossy()
                        .to_lowercase()
                        .contains(&unique_app_name.to_lowercase())
                );
                fs::remove_dir_all(&path).expect("Test cleanup failed");
            }
            None => {
                // No home directory in this environment; nothing else to verify.
                log::warn!("No ProjectDirs available; skipping directory assertions.");
            }
        }
    }

    #[test]
    fn test_log_file_path_is_in_temp_dir() {
        let path = log_file_path("FileCopyTouch");
        assert_eq!(path.parent(), Some(std::env::temp_dir().as_path()));
        assert_eq!(path.file_name().unwrap(), "filecopytouch.log");
    }

    #[test]
    fn test_file_name_string() {
        assert_eq!(
            file_name_string(Path::new("/some/dir/Alpha.txt")),
            Some("Alpha.txt".to_string())
        );
        assert_eq!(file_name_string(Path::new("/")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_name_string_rejects_invalid_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/some/dir").join(OsStr::from_bytes(b"report_\xff1.txt"));
        assert_eq!(file_name_string(&path), None);
    }
}
