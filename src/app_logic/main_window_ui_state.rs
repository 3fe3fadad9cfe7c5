/*
 * This module defines the MainWindowUiState struct.
 * MainWindowUiState holds the interactive search session of the main window:
 * the current query, the debouncer guarding the search, the displayed result
 * set, the copy workflow step in progress, and the channel from a running
 * copy worker. It is owned by `MyAppLogic` and only mutated while an event is
 * being handled.
 */
use crate::core::{CopyProgress, Debouncer, SearchConfig};
use crate::platform_layer::WindowId;
use std::sync::Mutex;
use std::sync::mpsc::Receiver;

/*
 * The text the search acts on. `Empty` is an explicit state; it is never
 * represented by a placeholder string.
 */
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchQuery {
    #[default]
    Empty,
    Text(String),
}

impl SearchQuery {
    pub fn from_input(text: &str) -> Self {
        if text.is_empty() {
            SearchQuery::Empty
        } else {
            SearchQuery::Text(text.to_string())
        }
    }

    // Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        match self {
            SearchQuery::Empty => 0,
            SearchQuery::Text(text) => text.chars().count(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SearchQuery::Empty => "",
            SearchQuery::Text(text) => text,
        }
    }
}

/*
 * A multi-step copy workflow that has started but not finished. While one is
 * set, list selections are ignored.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    AwaitingCopyConfirmation { file_name: String },
    CopyInFlight { file_name: String },
}

#[derive(Debug)]
pub struct MainWindowUiState {
    /* The unique identifier for the main application window. */
    pub window_id: WindowId,
    pub config: SearchConfig,
    pub query: SearchQuery,
    pub debouncer: Debouncer,
    /* The filenames currently listed, in display order. */
    pub results: Vec<String>,
    pub pending_action: Option<PendingAction>,
    /* Locked: `Receiver` is not `Sync`, and the owning handler must be. */
    pub copy_progress_rx: Option<Mutex<Receiver<CopyProgress>>>,
}

impl MainWindowUiState {
    pub fn new(window_id: WindowId, config: SearchConfig) -> Self {
        log::debug!("MainWindowUiState::new called for window_id: {window_id:?}");
        let debouncer = Debouncer::new(config.debounce_delay());
        MainWindowUiState {
            window_id,
            config,
            query: SearchQuery::Empty,
            debouncer,
            results: Vec::new(),
            pending_action: None,
            copy_progress_rx: None,
        }
    }

    pub fn meets_minimum_length(&self) -> bool {
        self.query.char_len() >= self.config.minimum_input_length
    }

    pub fn is_busy(&self) -> bool {
        self.pending_action.is_some()
    }

    pub fn result_at(&self, index: usize) -> Option<&str> {
        self.results.get(index).map(String::as_str)
    }

    /*
     * Returns to the initial empty session: no query, no results, no pending
     * debounce. Returns whether a debounce was pending, so the caller can stop
     * the platform timer.
     */
    pub fn reset_search(&mut self) -> bool {
        self.query = SearchQuery::Empty;
        self.results.clear();
        self.debouncer.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_min_length(minimum_input_length: usize) -> MainWindowUiState {
        MainWindowUiState::new(
            WindowId(1),
            SearchConfig {
                minimum_input_length,
                ..SearchConfig::default()
            },
        )
    }

    #[test]
    fn test_search_query_from_input() {
        assert_eq!(SearchQuery::from_input(""), SearchQuery::Empty);
        assert_eq!(
            SearchQuery::from_input("abc"),
            SearchQuery::Text("abc".to_string())
        );
    }

    #[test]
    fn test_search_query_length_counts_characters() {
        let query = SearchQuery::from_input("ÅÄÖåä");
        assert_eq!(query.char_len(), 5);
        assert_eq!(SearchQuery::Empty.char_len(), 0);
    }

    #[test]
    fn test_meets_minimum_length() {
        let mut state = state_with_min_length(5);
        state.query = SearchQuery::from_input("abcd");
        assert!(!state.meets_minimum_length());
        state.query = SearchQuery::from_input("abcde");
        assert!(state.meets_minimum_length());
    }

    #[test]
    fn test_reset_search_clears_everything_and_reports_pending_debounce() {
        // Arrange
        let mut state = state_with_min_length(5);
        state.query = SearchQuery::from_input("alpha");
        state.results = vec!["alpha.txt".to_string()];
        state.debouncer.arm();

        // Act
        let was_pending = state.reset_search();

        // Assert
        assert!(was_pending);
        assert_eq!(state.query, SearchQuery::Empty);
        assert!(state.results.is_empty());
        assert!(!state.debouncer.is_pending());
        assert!(!state.reset_search());
    }
}
