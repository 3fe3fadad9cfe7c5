/*
 * This module consolidates the core, platform-agnostic logic of the application:
 * loading the search configuration, debouncing input, searching the source
 * directory by file name, and clearing the target directory before copying a
 * file into it. The file-system facing pieces sit behind traits
 * (`ConfigManagerOperations`, `FileSearcherOperations`, `FileCopierOperations`)
 * so the application logic can be tested with mocks.
 */
pub mod config;
pub mod copy_progress;
pub mod debounce;
pub mod file_copier;
pub mod file_search;
pub mod path_utils;

// Re-export config related items
pub use config::{
    ConfigError, ConfigLoadOutcome, ConfigManagerOperations, CoreConfigManager, SearchConfig,
    load_or_create_config, missing_directories,
};

pub use debounce::Debouncer;

pub use file_search::{CoreFileSearcher, FileSearcherOperations, SearchError};

// Re-export copy workflow items
pub use copy_progress::{CopyJob, CopyProgress, spawn_copy_worker};
pub use file_copier::{CopyError, CopyReport, CoreFileCopier, FileCopierOperations};
