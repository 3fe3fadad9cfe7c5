use crate::app_logic::main_window_ui_state::{MainWindowUiState, PendingAction, SearchQuery};
use crate::app_logic::ui_constants;
use crate::core::{
    self, ConfigManagerOperations, CopyJob, CopyProgress, CopyReport, FileCopierOperations,
    FileSearcherOperations, SearchError,
};
use crate::platform_layer::{
    AppEvent, ControlId, MessageSeverity, PlatformCommand, PlatformEventHandler, TimerId,
    WindowId,
};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

// Made pub(crate) for access from handler_tests.rs and main.rs
pub(crate) const APP_NAME: &str = "FileCopyTouch";

// How often the copy worker's progress channel is drained.
pub(crate) const COPY_PROGRESS_POLL_INTERVAL_MS: u32 = 50;

const STATUS_READY: &str = "Ready to search files...";

/*
 * Manages the search session and the copy workflow in a platform-agnostic
 * manner. It processes UI events received from the platform layer and
 * enqueues commands to update the UI. File system work is delegated to the
 * `FileSearcherOperations` and `FileCopierOperations` traits, and the search
 * configuration comes from `ConfigManagerOperations`, so the whole flow can be
 * tested with mocks.
 */
pub struct MyAppLogic {
    config_manager: Arc<dyn ConfigManagerOperations>,
    file_searcher: Arc<dyn FileSearcherOperations>,
    file_copier: Arc<dyn FileCopierOperations>,
    // `None` until the main window has completed its UI setup.
    pub(crate) ui_state: Option<MainWindowUiState>,
    synchronous_command_queue: VecDeque<PlatformCommand>,
}

impl MyAppLogic {
    pub fn new(
        config_manager: Arc<dyn ConfigManagerOperations>,
        file_searcher: Arc<dyn FileSearcherOperations>,
        file_copier: Arc<dyn FileCopierOperations>,
    ) -> Self {
        MyAppLogic {
            config_manager,
            file_searcher,
            file_copier,
            ui_state: None,
            synchronous_command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.synchronous_command_queue.push_back(command);
    }

    fn set_status(&mut self, window_id: WindowId, text: impl Into<String>, severity: MessageSeverity) {
        self.enqueue_command(PlatformCommand::UpdateLabelText {
            window_id,
            control_id: ui_constants::STATUS_LABEL_ID,
            text: text.into(),
            severity,
        });
    }

    fn show_message(
        &mut self,
        window_id: WindowId,
        title: &str,
        message: String,
        severity: MessageSeverity,
    ) {
        self.enqueue_command(PlatformCommand::ShowMessageDialog {
            window_id,
            title: title.to_string(),
            message,
            severity,
        });
    }

    fn populate_results(&mut self, window_id: WindowId, items: Vec<String>) {
        self.enqueue_command(PlatformCommand::PopulateList {
            window_id,
            control_id: ui_constants::RESULTS_LIST_ID,
            items,
        });
    }

    fn clear_list_selection(&mut self, window_id: WindowId) {
        self.enqueue_command(PlatformCommand::ClearListSelection {
            window_id,
            control_id: ui_constants::RESULTS_LIST_ID,
        });
    }

    fn stop_timer(&mut self, window_id: WindowId, timer_id: TimerId) {
        self.enqueue_command(PlatformCommand::StopTimer {
            window_id,
            timer_id,
        });
    }

    /*
     * Enables or disables everything the operator could use to start another
     * search or copy while a copy is running.
     */
    fn set_interaction_enabled(&mut self, window_id: WindowId, enabled: bool) {
        for control_id in [
            ui_constants::RESULTS_LIST_ID,
            ui_constants::SEARCH_INPUT_ID,
            ui_constants::CLEAR_BUTTON_ID,
        ] {
            self.enqueue_command(PlatformCommand::SetControlEnabled {
                window_id,
                control_id,
                enabled,
            });
        }
    }

    // The session for `window_id`, if it is the main window.
    fn ui_state_for(&mut self, window_id: WindowId) -> Option<&mut MainWindowUiState> {
        self.ui_state
            .as_mut()
            .filter(|ui_state| ui_state.window_id == window_id)
    }

    /*
     * Handles the completion of the static UI setup. Loads the configuration
     * (falling back to defaults with a warning), creates the session, fills in
     * the informational labels, warns about missing directories, and finally
     * shows the window.
     */
    fn on_main_window_setup_complete(&mut self, window_id: WindowId) {
        log::debug!("AppLogic: Main window UI setup complete for {window_id:?}.");

        let outcome = core::load_or_create_config(self.config_manager.as_ref(), APP_NAME);
        if let Some(warning) = &outcome.warning {
            self.show_message(
                window_id,
                "Configuration Error",
                format!("Error loading configuration: {warning}\n\nUsing default values."),
                MessageSeverity::Warning,
            );
        }
        let config = outcome.config;
        log::info!("AppLogic: Using configuration: {}", config.summary_line());

        let missing: Vec<String> = core::missing_directories(&config)
            .into_iter()
            .map(|(label, path)| {
                format!("• {label} directory does not exist: {}", path.display())
            })
            .collect();
        let summary = config.summary_line();
        self.ui_state = Some(MainWindowUiState::new(window_id, config));

        self.enqueue_command(PlatformCommand::SetWindowTitle {
            window_id,
            title: format!("{} - Touch Interface", ui_constants::MAIN_WINDOW_TITLE),
        });
        self.enqueue_command(PlatformCommand::UpdateLabelText {
            window_id,
            control_id: ui_constants::CONFIG_INFO_LABEL_ID,
            text: summary,
            severity: MessageSeverity::Information,
        });
        self.set_status(window_id, STATUS_READY, MessageSeverity::Information);

        if !missing.is_empty() {
            log::warn!("AppLogic: {} configured director(y/ies) missing.", missing.len());
            self.show_message(
                window_id,
                "Directory Warning",
                format!(
                    "Directory validation:\n{}\n\nPlease check your {} file.",
                    missing.join("\n"),
                    core::config::CONFIG_FILENAME
                ),
                MessageSeverity::Warning,
            );
        }

        self.enqueue_command(PlatformCommand::ShowWindow { window_id });
    }

    /*
     * Applies a change of the input text. Short or empty queries clear the
     * results at once; long enough queries (re)arm the debounce timer so the
     * search only runs once the input has been quiet for the configured delay.
     */
    fn handle_input_text_changed(&mut self, window_id: WindowId, text: String) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            log::warn!("AppLogic: InputTextChanged for unknown window {window_id:?}.");
            return;
        };
        if ui_state.is_busy() {
            log::debug!("AppLogic: Ignoring input change while a copy is pending.");
            return;
        }
        let query = SearchQuery::from_input(&text);
        if query == ui_state.query {
            // Echo of a text this logic set itself.
            log::trace!("AppLogic: Input text unchanged, ignoring.");
            return;
        }

        ui_state.query = query;
        let timer_was_pending = ui_state.debouncer.cancel();
        let minimum_input_length = ui_state.config.minimum_input_length;
        let is_empty = ui_state.query == SearchQuery::Empty;
        let meets_minimum = ui_state.meets_minimum_length();
        let delay_ms = ui_state.debouncer.delay_millis_u32();
        if !meets_minimum {
            ui_state.results.clear();
        } else {
            let generation = ui_state.debouncer.arm();
            log::trace!(
                "AppLogic: Debounce generation {generation} armed for {:?}.",
                ui_state.debouncer.delay()
            );
        }

        if timer_was_pending {
            self.stop_timer(window_id, TimerId::SearchDebounce);
        }
        if is_empty {
            self.populate_results(window_id, Vec::new());
            self.set_status(window_id, STATUS_READY, MessageSeverity::Information);
        } else if !meets_minimum {
            self.populate_results(window_id, Vec::new());
            self.set_status(
                window_id,
                format!("Enter at least {minimum_input_length} characters to search..."),
                MessageSeverity::Information,
            );
        } else {
            self.enqueue_command(PlatformCommand::StartTimer {
                window_id,
                timer_id: TimerId::SearchDebounce,
                interval_ms: delay_ms,
            });
            self.set_status(window_id, "Typing...", MessageSeverity::Information);
        }
    }

    fn handle_timer_elapsed(&mut self, window_id: WindowId, timer_id: TimerId) {
        match timer_id {
            TimerId::SearchDebounce => {
                // Platform timers repeat; the debounce is one-shot.
                self.stop_timer(window_id, TimerId::SearchDebounce);
                let Some(ui_state) = self.ui_state_for(window_id) else {
                    return;
                };
                if ui_state.is_busy() {
                    ui_state.debouncer.cancel();
                    log::debug!("AppLogic: Debounce tick ignored while a copy is pending.");
                    return;
                }
                match ui_state.debouncer.fire() {
                    Some(generation) => {
                        log::debug!("AppLogic: Debounce generation {generation} fired.");
                        self.run_search(window_id);
                    }
                    None => log::trace!("AppLogic: Stale debounce tick ignored."),
                }
            }
            TimerId::CopyProgressPoll => self.poll_copy_progress(window_id),
        }
    }

    /*
     * Runs the directory search for the current query and replaces the
     * displayed results. Errors leave an empty list and are reported on the
     * status line only.
     */
    fn run_search(&mut self, window_id: WindowId) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        if !ui_state.meets_minimum_length() {
            log::debug!("AppLogic: Query below minimum length at fire time; no search.");
            return;
        }
        let query = ui_state.query.as_str().to_string();
        let source_directory = ui_state.config.source_directory.clone();

        log::debug!("AppLogic: Searching {source_directory:?} for '{query}'.");
        let (results, status, severity) =
            match self.file_searcher.search(&query, &source_directory) {
                Ok(names) => {
                    let status = format!("Found {} matching file(s)", names.len());
                    (names, status, MessageSeverity::Information)
                }
                Err(SearchError::SourceDirectoryNotFound(path)) => {
                    log::warn!("AppLogic: Source directory {path:?} not found.");
                    (
                        Vec::new(),
                        "Source directory not found!".to_string(),
                        MessageSeverity::Error,
                    )
                }
                Err(e) => (
                    Vec::new(),
                    format!("Error searching files: {e}"),
                    MessageSeverity::Error,
                ),
            };

        if let Some(ui_state) = self.ui_state_for(window_id) {
            ui_state.results = results.clone();
        }
        self.populate_results(window_id, results);
        self.set_status(window_id, status, severity);
    }

    /*
     * Starts the copy workflow for the selected result: verifies the source
     * still exists and asks the operator to confirm.
     */
    fn handle_list_selection_changed(&mut self, window_id: WindowId, selected_index: Option<usize>) {
        let Some(index) = selected_index else {
            return;
        };
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        if let Some(pending) = &ui_state.pending_action {
            log::debug!("AppLogic: Ignoring selection while {pending:?}.");
            return;
        }
        let Some(file_name) = ui_state.result_at(index).map(str::to_string) else {
            log::warn!("AppLogic: Selection index {index} outside the result list.");
            return;
        };
        let source_directory = ui_state.config.source_directory.clone();
        let target_directory = ui_state.config.target_directory.clone();

        self.set_status(window_id, "Preparing to copy file...", MessageSeverity::Information);
        if let Err(e) = self.file_copier.locate_source(&source_directory, &file_name) {
            self.abort_copy_before_start(window_id, e.to_string());
            return;
        }

        // A search still waiting to fire would replace the list being acted on.
        let mut timer_was_pending = false;
        if let Some(ui_state) = self.ui_state_for(window_id) {
            timer_was_pending = ui_state.debouncer.cancel();
            ui_state.pending_action = Some(PendingAction::AwaitingCopyConfirmation {
                file_name: file_name.clone(),
            });
        }
        if timer_was_pending {
            self.stop_timer(window_id, TimerId::SearchDebounce);
        }
        self.enqueue_command(PlatformCommand::ShowConfirmationDialog {
            window_id,
            title: "Confirm File Copy".to_string(),
            message: format!(
                "This will:\n\n1. Clear all files in the target directory:\n   {}\n\n2. Copy the selected file:\n   {file_name}\n\nDo you want to continue?",
                target_directory.display()
            ),
        });
    }

    fn abort_copy_before_start(&mut self, window_id: WindowId, message: String) {
        log::error!("AppLogic: Copy aborted: {message}");
        self.set_status(window_id, message.clone(), MessageSeverity::Error);
        self.show_message(window_id, "File Error", message, MessageSeverity::Error);
        self.clear_list_selection(window_id);
    }

    fn handle_confirmation_completed(&mut self, window_id: WindowId, confirmed: bool) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        let file_name = match ui_state.pending_action.take() {
            Some(PendingAction::AwaitingCopyConfirmation { file_name }) => file_name,
            other => {
                log::warn!("AppLogic: Unexpected confirmation result while {other:?}.");
                ui_state.pending_action = other;
                return;
            }
        };

        if !confirmed {
            log::info!("AppLogic: Copy of '{file_name}' cancelled by the operator.");
            self.set_status(window_id, "Copy operation cancelled", MessageSeverity::Information);
            self.clear_list_selection(window_id);
            return;
        }
        self.start_copy(window_id, file_name);
    }

    /*
     * Hands the clear-and-copy job to the background worker. The source is
     * located again since the confirmation may have been open for a while.
     */
    fn start_copy(&mut self, window_id: WindowId, file_name: String) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        let source_directory = ui_state.config.source_directory.clone();
        let target_directory = ui_state.config.target_directory.clone();

        let source_path = match self.file_copier.locate_source(&source_directory, &file_name) {
            Ok(path) => path,
            Err(e) => {
                self.abort_copy_before_start(window_id, e.to_string());
                return;
            }
        };

        log::info!("AppLogic: Copying {source_path:?} into {target_directory:?}.");
        let rx = core::spawn_copy_worker(
            Arc::clone(&self.file_copier),
            CopyJob {
                source_path,
                target_directory,
            },
        );
        if let Some(ui_state) = self.ui_state_for(window_id) {
            ui_state.copy_progress_rx = Some(Mutex::new(rx));
            ui_state.pending_action = Some(PendingAction::CopyInFlight { file_name });
        }

        self.set_interaction_enabled(window_id, false);
        self.set_status(window_id, "Clearing target directory...", MessageSeverity::Information);
        self.enqueue_command(PlatformCommand::StartTimer {
            window_id,
            timer_id: TimerId::CopyProgressPoll,
            interval_ms: COPY_PROGRESS_POLL_INTERVAL_MS,
        });
    }

    /*
     * Drains the copy worker's channel. A worker that disappears without a
     * final message is treated as a failed copy.
     */
    fn poll_copy_progress(&mut self, window_id: WindowId) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            self.stop_timer(window_id, TimerId::CopyProgressPoll);
            return;
        };
        let Some(rx) = ui_state.copy_progress_rx.as_ref() else {
            log::trace!("AppLogic: Copy progress tick without a running copy.");
            self.stop_timer(window_id, TimerId::CopyProgressPoll);
            return;
        };

        let (messages, disconnected) = drain_copy_progress(rx);

        for message in messages {
            match message {
                CopyProgress::TargetCleared { removed_entries } => {
                    log::debug!("AppLogic: Target cleared, {removed_entries} entr(y/ies) removed.");
                    self.set_status(window_id, "Copying file...", MessageSeverity::Information);
                }
                CopyProgress::Completed(report) => {
                    self.finish_copy_success(window_id, report);
                    return;
                }
                CopyProgress::Failed(e) => {
                    self.finish_copy_failure(window_id, e.to_string());
                    return;
                }
            }
        }
        if disconnected {
            self.finish_copy_failure(
                window_id,
                "the copy worker stopped without reporting a result".to_string(),
            );
        }
    }

    fn end_copy(&mut self, window_id: WindowId) {
        if let Some(ui_state) = self.ui_state_for(window_id) {
            ui_state.copy_progress_rx = None;
            ui_state.pending_action = None;
        }
        self.stop_timer(window_id, TimerId::CopyProgressPoll);
    }

    fn finish_copy_success(&mut self, window_id: WindowId, report: CopyReport) {
        log::info!(
            "AppLogic: Copied {} byte(s) from {:?} to {:?}.",
            report.bytes_copied,
            report.source_path,
            report.target_path
        );
        self.end_copy(window_id);
        self.set_status(window_id, "Copy completed successfully!", MessageSeverity::Information);
        self.show_message(
            window_id,
            "Copy Complete",
            format!(
                "File copied successfully!\n\nFrom: {}\nTo: {}\n\nClick OK to return to the main screen.",
                report.source_path.display(),
                report.target_path.display()
            ),
            MessageSeverity::Information,
        );
        self.reset_search_ui(window_id);
        self.set_interaction_enabled(window_id, true);
    }

    fn finish_copy_failure(&mut self, window_id: WindowId, message: String) {
        log::error!("AppLogic: Copy failed: {message}");
        self.end_copy(window_id);
        self.set_status(
            window_id,
            format!("Error copying file: {message}"),
            MessageSeverity::Error,
        );
        self.show_message(
            window_id,
            "Copy Error",
            format!("Error copying file: {message}"),
            MessageSeverity::Error,
        );
        self.clear_list_selection(window_id);
        self.set_interaction_enabled(window_id, true);
    }

    fn handle_button_clicked(&mut self, window_id: WindowId, control_id: ControlId) {
        if control_id != ui_constants::CLEAR_BUTTON_ID {
            log::warn!("AppLogic: Click on unknown button {}.", control_id.raw());
            return;
        }
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        if ui_state.is_busy() {
            log::debug!("AppLogic: Clear ignored while a copy is pending.");
            return;
        }
        self.reset_search_ui(window_id);
    }

    /*
     * Returns the window to its initial state: empty input, no results, no
     * pending debounce, ready status.
     */
    fn reset_search_ui(&mut self, window_id: WindowId) {
        let Some(ui_state) = self.ui_state_for(window_id) else {
            return;
        };
        let timer_was_pending = ui_state.reset_search();
        if timer_was_pending {
            self.stop_timer(window_id, TimerId::SearchDebounce);
        }
        self.enqueue_command(PlatformCommand::SetInputText {
            window_id,
            control_id: ui_constants::SEARCH_INPUT_ID,
            text: String::new(),
        });
        self.populate_results(window_id, Vec::new());
        self.clear_list_selection(window_id);
        self.set_status(window_id, STATUS_READY, MessageSeverity::Information);
    }
}

/*
 * Takes every message currently queued by the copy worker, stopping after the
 * final one. The flag is true when the worker is gone; a poisoned lock counts
 * as gone too.
 */
fn drain_copy_progress(rx: &Mutex<Receiver<CopyProgress>>) -> (Vec<CopyProgress>, bool) {
    let Ok(rx) = rx.lock() else {
        log::error!("AppLogic: Copy progress channel lock poisoned.");
        return (Vec::new(), true);
    };
    let mut messages = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(message) => {
                let is_final = message.is_final();
                messages.push(message);
                if is_final {
                    return (messages, false);
                }
            }
            Err(TryRecvError::Empty) => return (messages, false),
            Err(TryRecvError::Disconnected) => return (messages, true),
        }
    }
}

impl PlatformEventHandler for MyAppLogic {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: Handling {event:?}");
        match event {
            AppEvent::MainWindowUISetupComplete { window_id } => {
                self.on_main_window_setup_complete(window_id)
            }
            AppEvent::WindowCloseRequestedByUser { window_id } => {
                log::debug!("AppLogic: Close requested for {window_id:?}.");
                self.enqueue_command(PlatformCommand::CloseWindow { window_id });
            }
            AppEvent::WindowDestroyed { window_id } => {
                if self.ui_state_for(window_id).is_some() {
                    log::debug!("AppLogic: Main window destroyed, quitting.");
                    self.ui_state = None;
                    self.enqueue_command(PlatformCommand::QuitApplication);
                }
            }
            AppEvent::InputTextChanged {
                window_id,
                control_id,
                text,
            } => {
                if control_id == ui_constants::SEARCH_INPUT_ID {
                    self.handle_input_text_changed(window_id, text);
                }
            }
            AppEvent::ListSelectionChanged {
                window_id,
                control_id,
                selected_index,
            } => {
                if control_id == ui_constants::RESULTS_LIST_ID {
                    self.handle_list_selection_changed(window_id, selected_index);
                }
            }
            AppEvent::ButtonClicked {
                window_id,
                control_id,
            } => self.handle_button_clicked(window_id, control_id),
            AppEvent::TimerElapsed {
                window_id,
                timer_id,
            } => self.handle_timer_elapsed(window_id, timer_id),
            AppEvent::ConfirmationDialogCompleted {
                window_id,
                confirmed,
            } => self.handle_confirmation_completed(window_id, confirmed),
        }
    }

    fn on_quit(&mut self) {
        if let Some(PendingAction::CopyInFlight { file_name }) = self
            .ui_state
            .as_ref()
            .and_then(|ui_state| ui_state.pending_action.as_ref())
        {
            log::warn!("AppLogic: Quitting while the copy of '{file_name}' is still running.");
        }
        log::debug!("AppLogic: on_quit called.");
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.synchronous_command_queue.pop_front()
    }
}
