/*
 * Manages the application's search configuration: the minimum query length,
 * the debounce delay, and the fixed source and target directories. The values
 * are persisted as a small JSON document (`config.json`) in the per-user local
 * configuration directory and are read once at startup.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) to allow for
 * different storage backends or mock implementations for testing. The concrete
 * implementation (`CoreConfigManager`) handles file system interactions, using
 * `path_utils` to locate the configuration directory unless an explicit one is
 * supplied.
 */
use crate::core::path_utils;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "config.json";

pub const MIN_INPUT_LENGTH_RANGE: (usize, usize) = (5, 20);
pub const DEBOUNCE_MILLISECONDS_RANGE: (u64, u64) = (100, 3000);

const DEFAULT_MINIMUM_INPUT_LENGTH: usize = 5;
const DEFAULT_DEBOUNCE_MILLISECONDS: u64 = 500;

#[cfg(target_os = "windows")]
const DEFAULT_SOURCE_DIRECTORY: &str = r"C:\SourceFiles";
#[cfg(target_os = "windows")]
const DEFAULT_TARGET_DIRECTORY: &str = r"C:\TargetFiles";
#[cfg(not(target_os = "windows"))]
const DEFAULT_SOURCE_DIRECTORY: &str = "source_files";
#[cfg(not(target_os = "windows"))]
const DEFAULT_TARGET_DIRECTORY: &str = "target_files";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "Configuration file is not valid JSON: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine the directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/*
 * The immutable search configuration. Keys are PascalCase on disk so that
 * configuration files written by the earlier desktop tool load unchanged.
 * Missing keys fall back to their defaults. The numeric keys accept any JSON
 * integer, negative ones included, so a bad hand edit is clamped by
 * `clamped()` instead of discarding the whole file.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchConfig {
    #[serde(deserialize_with = "deserialize_saturating_usize")]
    pub minimum_input_length: usize,
    #[serde(deserialize_with = "deserialize_saturating_u64")]
    pub debounce_milliseconds: u64,
    pub source_directory: PathBuf,
    pub target_directory: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            minimum_input_length: DEFAULT_MINIMUM_INPUT_LENGTH,
            debounce_milliseconds: DEFAULT_DEBOUNCE_MILLISECONDS,
            source_directory: PathBuf::from(DEFAULT_SOURCE_DIRECTORY),
            target_directory: PathBuf::from(DEFAULT_TARGET_DIRECTORY),
        }
    }
}

// Negative values become 0 and oversized ones the maximum; `clamped()` does the rest.
fn deserialize_saturating_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u64::try_from(raw).unwrap_or(0))
}

fn deserialize_saturating_usize<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_saturating_u64(deserializer)?;
    Ok(usize::try_from(raw).unwrap_or(usize::MAX))
}

impl SearchConfig {
    /*
     * Returns a copy with the numeric settings forced into their allowed ranges.
     * Out-of-range values are logged, since they usually mean a hand-edited file.
     */
    pub fn clamped(mut self) -> Self {
        let (min_len_lo, min_len_hi) = MIN_INPUT_LENGTH_RANGE;
        let clamped_len = self.minimum_input_length.clamp(min_len_lo, min_len_hi);
        if clamped_len != self.minimum_input_length {
            log::warn!(
                "SearchConfig: MinimumInputLength {} out of range, using {clamped_len}.",
                self.minimum_input_length
            );
            self.minimum_input_length = clamped_len;
        }

        let (debounce_lo, debounce_hi) = DEBOUNCE_MILLISECONDS_RANGE;
        let clamped_debounce = self.debounce_milliseconds.clamp(debounce_lo, debounce_hi);
        if clamped_debounce != self.debounce_milliseconds {
            log::warn!(
                "SearchConfig: DebounceMilliseconds {} out of range, using {clamped_debounce}.",
                self.debounce_milliseconds
            );
            self.debounce_milliseconds = clamped_debounce;
        }
        self
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_milliseconds)
    }

    /*
     * One-line human-readable summary shown beneath the result list.
     */
    pub fn summary_line(&self) -> String {
        format!(
            "Min Length: {} | Debounce: {}ms | Source: {} | Target: {}",
            self.minimum_input_length,
            self.debounce_milliseconds,
            self.source_directory.display(),
            self.target_directory.display()
        )
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    /*
     * Loads the stored configuration. `Ok(None)` means no configuration file
     * exists yet. The returned values are not clamped.
     */
    fn load_config(&self, app_name: &str) -> Result<Option<SearchConfig>>;
    fn save_config(&self, app_name: &str, config: &SearchConfig) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    /*
     * Creates a manager that reads and writes `config.json` inside `config_dir`
     * instead of the per-user configuration directory.
     */
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir),
        }
    }

    fn config_file_path(&self, app_name: &str) -> Result<PathBuf> {
        let config_dir = match &self.config_dir_override {
            Some(dir) => {
                if !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(config_dir.join(CONFIG_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_config(&self, app_name: &str) -> Result<Option<SearchConfig>> {
        let file_path = self.config_file_path(app_name)?;
        log::trace!("CoreConfigManager: Loading configuration from {file_path:?}");

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Configuration file {file_path:?} does not exist.");
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path)?;
        let config: SearchConfig = serde_json::from_str(&contents)?;
        log::debug!("CoreConfigManager: Loaded configuration {config:?} from {file_path:?}.");
        Ok(Some(config))
    }

    fn save_config(&self, app_name: &str, config: &SearchConfig) -> Result<()> {
        let file_path = self.config_file_path(app_name)?;
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&file_path, json)?;
        log::debug!("CoreConfigManager: Saved configuration to {file_path:?}.");
        Ok(())
    }
}

/*
 * The result of startup configuration loading. `warning` carries the error
 * that forced a fallback to defaults; the configuration is always usable.
 */
#[derive(Debug)]
pub struct ConfigLoadOutcome {
    pub config: SearchConfig,
    pub warning: Option<ConfigError>,
}

/*
 * Loads the configuration for startup. An absent file is created with the
 * defaults; an unreadable or malformed file is left untouched and the defaults
 * are used. Loaded values are clamped to their allowed ranges.
 */
pub fn load_or_create_config(
    config_manager: &dyn ConfigManagerOperations,
    app_name: &str,
) -> ConfigLoadOutcome {
    match config_manager.load_config(app_name) {
        Ok(Some(config)) => ConfigLoadOutcome {
            config: config.clamped(),
            warning: None,
        },
        Ok(None) => {
            let config = SearchConfig::default();
            log::info!("Config: No configuration found, writing defaults.");
            let warning = config_manager.save_config(app_name, &config).err();
            if let Some(e) = &warning {
                log::warn!("Config: Failed to write default configuration: {e}");
            }
            ConfigLoadOutcome { config, warning }
        }
        Err(e) => {
            log::warn!("Config: Failed to load configuration, using defaults: {e}");
            ConfigLoadOutcome {
                config: SearchConfig::default(),
                warning: Some(e),
            }
        }
    }
}

/*
 * Lists the configured directories that do not currently exist, source first.
 */
pub fn missing_directories(config: &SearchConfig) -> Vec<(&'static str, &Path)> {
    let mut missing = Vec::new();
    if !config.source_directory.is_dir() {
        missing.push(("Source", config.source_directory.as_path()));
    }
    if !config.target_directory.is_dir() {
        missing.push(("Target", config.target_directory.as_path()));
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const APP_NAME: &str = "AnyApp";

    #[test]
    fn test_core_config_manager_save_and_load_roundtrip() {
        // Arrange
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        let config = SearchConfig {
            minimum_input_length: 7,
            debounce_milliseconds: 250,
            source_directory: PathBuf::from("/data/in"),
            target_directory: PathBuf::from("/data/out"),
        };

        // Act
        manager.save_config(APP_NAME, &config).unwrap();
        let loaded = manager.load_config(APP_NAME).unwrap();

        // Assert
        assert_eq!(loaded, Some(config));
    }

    #[test]
    fn test_load_config_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        match manager.load_config(APP_NAME) {
            Ok(None) => {}
            Ok(Some(c)) => panic!("Expected None when file doesn't exist, got {c:?}"),
            Err(e) => panic!("Unexpected error when file doesn't exist: {e:?}"),
        }
    }

    #[test]
    fn test_load_config_reads_pascal_case_keys_with_missing_fields() {
        // Arrange
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "MinimumInputLength": 8, "SourceDirectory": "D:\\Scans" }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        // Act
        let loaded = manager.load_config(APP_NAME).unwrap().unwrap();

        // Assert
        assert_eq!(loaded.minimum_input_length, 8);
        assert_eq!(loaded.debounce_milliseconds, DEFAULT_DEBOUNCE_MILLISECONDS);
        assert_eq!(loaded.source_directory, PathBuf::from(r"D:\Scans"));
        assert_eq!(
            loaded.target_directory,
            PathBuf::from(DEFAULT_TARGET_DIRECTORY)
        );
    }

    #[test]
    fn test_saved_file_uses_pascal_case_keys() {
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());
        manager
            .save_config(APP_NAME, &SearchConfig::default())
            .unwrap();

        let text = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(text.contains("\"MinimumInputLength\": 5"));
        assert!(text.contains("\"DebounceMilliseconds\": 500"));
        assert!(text.contains("\"SourceDirectory\""));
        assert!(text.contains("\"TargetDirectory\""));
    }

    #[test]
    fn test_clamped_limits_out_of_range_values() {
        let low = SearchConfig {
            minimum_input_length: 1,
            debounce_milliseconds: 10,
            ..SearchConfig::default()
        }
        .clamped();
        assert_eq!(low.minimum_input_length, 5);
        assert_eq!(low.debounce_milliseconds, 100);

        let high = SearchConfig {
            minimum_input_length: 99,
            debounce_milliseconds: 60_000,
            ..SearchConfig::default()
        }
        .clamped();
        assert_eq!(high.minimum_input_length, 20);
        assert_eq!(high.debounce_milliseconds, 3000);

        let in_range = SearchConfig {
            minimum_input_length: 12,
            debounce_milliseconds: 1200,
            ..SearchConfig::default()
        };
        assert_eq!(in_range.clone().clamped(), in_range);
    }

    #[test]
    fn test_load_or_create_config_writes_defaults_when_absent() {
        // Arrange
        crate::initialize_logging();
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        // Act
        let outcome = load_or_create_config(&manager, APP_NAME);

        // Assert
        assert_eq!(outcome.config, SearchConfig::default());
        assert!(outcome.warning.is_none());
        assert!(dir.path().join(CONFIG_FILENAME).exists());
        assert_eq!(
            manager.load_config(APP_NAME).unwrap(),
            Some(SearchConfig::default())
        );
    }

    #[test]
    fn test_load_or_create_config_clamps_loaded_values() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "MinimumInputLength": 2, "DebounceMilliseconds": 9000 }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        let outcome = load_or_create_config(&manager, APP_NAME);

        assert!(outcome.warning.is_none());
        assert_eq!(outcome.config.minimum_input_length, 5);
        assert_eq!(outcome.config.debounce_milliseconds, 3000);
    }

    #[test]
    fn test_negative_values_clamp_and_keep_configured_directories() {
        // Arrange
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{
                "MinimumInputLength": -3,
                "DebounceMilliseconds": -250,
                "SourceDirectory": "/scans/in",
                "TargetDirectory": "/scans/out"
            }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        // Act
        let outcome = load_or_create_config(&manager, APP_NAME);

        // Assert
        assert!(outcome.warning.is_none(), "{:?}", outcome.warning);
        assert_eq!(outcome.config.minimum_input_length, 5);
        assert_eq!(outcome.config.debounce_milliseconds, 100);
        assert_eq!(outcome.config.source_directory, PathBuf::from("/scans/in"));
        assert_eq!(outcome.config.target_directory, PathBuf::from("/scans/out"));
    }

    #[test]
    fn test_non_integer_length_is_still_a_format_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "MinimumInputLength": "five" }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        assert!(matches!(
            manager.load_config(APP_NAME),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_or_create_config_corrupt_file_falls_back_with_warning() {
        // Arrange
        crate::initialize_logging();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "{ not json").unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().to_path_buf());

        // Act
        let outcome = load_or_create_config(&manager, APP_NAME);

        // Assert
        assert_eq!(outcome.config, SearchConfig::default());
        assert!(matches!(outcome.warning, Some(ConfigError::Json(_))));
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "{ not json",
            "A corrupt file must not be overwritten."
        );
    }

    #[test]
    fn test_core_config_manager_uses_project_dirs_by_default() {
        // Arrange
        let unique_app_name = format!("TestApp_CoreConfig_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();
        let Some(config_dir) = path_utils::get_base_app_config_local_dir(&unique_app_name) else {
            log::warn!("No ProjectDirs available; skipping test.");
            return;
        };

        // Act
        let save_result = manager.save_config(&unique_app_name, &SearchConfig::default());

        // Assert
        assert!(save_result.is_ok(), "Saving configuration should succeed.");
        assert!(config_dir.join(CONFIG_FILENAME).exists());
        assert_eq!(
            manager.load_config(&unique_app_name).unwrap(),
            Some(SearchConfig::default())
        );
        if let Err(e) = fs::remove_dir_all(&config_dir) {
            eprintln!("Test cleanup failed for config_dir {config_dir:?}: {e}");
        }
    }

    #[test]
    fn test_missing_directories_lists_only_absent_ones_source_first() {
        let dir = tempdir().unwrap();
        let config = SearchConfig {
            source_directory: dir.path().join("nope_src"),
            target_directory: dir.path().to_path_buf(),
            ..SearchConfig::default()
        };
        let missing = missing_directories(&config);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, "Source");

        let config_all_missing = SearchConfig {
            source_directory: dir.path().join("a"),
            target_directory: dir.path().join("b"),
            ..SearchConfig::default()
        };
        let labels: Vec<&str> = missing_directories(&config_all_missing)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Source", "Target"]);
    }

    #[test]
    fn test_summary_line_format() {
        let config = SearchConfig {
            minimum_input_length: 6,
            debounce_milliseconds: 750,
            source_directory: PathBuf::from("src_dir"),
            target_directory: PathBuf::from("dst_dir"),
        };
        assert_eq!(
            config.summary_line(),
            "Min Length: 6 | Debounce: 750ms | Source: src_dir | Target: dst_dir"
        );
    }
}
