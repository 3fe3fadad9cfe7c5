/*
 * A line-oriented console backend implementing the same `PlatformInterface`
 * as the Win32 backend, so the application logic runs unchanged on platforms
 * without a native window.
 *
 * Each line read from stdin is interpreted as the complete text of the input
 * control. A few lines are reserved:
 *   `#N`      selects result N (1-based) in the list
 *   `:clear`  clicks the clear button
 *   `:quit`   closes the window
 * While a confirmation is open, the next line answers it (`y`/`n`).
 *
 * Timers are deadlines serviced by waiting on the stdin channel with
 * `recv_timeout`, and repeat until stopped, as Win32 timers do.
 */

use super::error::{PlatformError, Result as PlatformResult};
use super::types::{
    AppEvent, ControlId, LabelClass, MessageSeverity, PlatformCommand, PlatformEventHandler,
    TimerId, WindowConfig, WindowId,
};

use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead};
use std::sync::{
    Arc, Mutex, MutexGuard, Weak,
    atomic::{AtomicBool, AtomicUsize, Ordering},
    mpsc::{self, Receiver, RecvTimeoutError},
};
use std::thread;
use std::time::{Duration, Instant};

// Upper bound on a single wait when no timer is running.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/*
 * What a single stdin line means when no confirmation is open.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleInput {
    Text(String),
    // 0-based index into the displayed list.
    Select(usize),
    Clear,
    Quit,
}

pub(crate) fn parse_console_line(line: &str) -> ConsoleInput {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        ":clear" => return ConsoleInput::Clear,
        ":quit" => return ConsoleInput::Quit,
        _ => {}
    }
    if let Some(number) = line.trim().strip_prefix('#') {
        if let Ok(position) = number.parse::<usize>() {
            if position >= 1 {
                return ConsoleInput::Select(position - 1);
            }
        }
    }
    ConsoleInput::Text(line.to_string())
}

/*
 * Interprets the answer to a confirmation. `None` means the line was neither
 * yes nor no and the question should be asked again.
 */
pub(crate) fn parse_confirmation_answer(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleControlKind {
    Label(LabelClass),
    Input,
    ListBox,
    Button,
}

#[derive(Debug)]
struct ConsoleControl {
    kind: ConsoleControlKind,
    enabled: bool,
    text: String,
}

#[derive(Debug)]
struct RunningTimer {
    deadline: Instant,
    interval: Duration,
}

#[derive(Debug)]
struct ConsoleWindowData {
    title: String,
    visible: bool,
    controls: BTreeMap<ControlId, ConsoleControl>,
    list_items: Vec<String>,
    timers: HashMap<TimerId, RunningTimer>,
}

impl ConsoleWindowData {
    fn new(title: &str) -> Self {
        ConsoleWindowData {
            title: title.to_string(),
            visible: false,
            controls: BTreeMap::new(),
            list_items: Vec::new(),
            timers: HashMap::new(),
        }
    }

    fn register_control(
        &mut self,
        control_id: ControlId,
        kind: ConsoleControlKind,
        text: String,
    ) -> PlatformResult<()> {
        if self.controls.contains_key(&control_id) {
            return Err(PlatformError::ControlCreationFailed(format!(
                "Control ID {} already exists",
                control_id.raw()
            )));
        }
        self.controls.insert(
            control_id,
            ConsoleControl {
                kind,
                enabled: true,
                text,
            },
        );
        Ok(())
    }

    fn control_mut(&mut self, control_id: ControlId) -> PlatformResult<&mut ConsoleControl> {
        self.controls.get_mut(&control_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("Control ID {} not found", control_id.raw()))
        })
    }

    // The first control of the given kind, in control ID order.
    fn find_control(&self, matches: impl Fn(ConsoleControlKind) -> bool) -> Option<(ControlId, bool)> {
        self.controls
            .iter()
            .find(|(_, control)| matches(control.kind))
            .map(|(id, control)| (*id, control.enabled))
    }
}

pub(crate) struct ConsoleInternalState {
    next_window_id_counter: AtomicUsize,
    active_windows: Mutex<HashMap<WindowId, ConsoleWindowData>>,
    application_event_handler: Mutex<Option<Weak<Mutex<dyn PlatformEventHandler>>>>,
    // The window whose confirmation question awaits a y/n line.
    pending_confirmation: Mutex<Option<WindowId>>,
    quit_requested: AtomicBool,
    app_name: String,
}

impl ConsoleInternalState {
    pub(crate) fn new(app_name: String) -> Arc<Self> {
        Arc::new(Self {
            next_window_id_counter: AtomicUsize::new(1),
            active_windows: Mutex::new(HashMap::new()),
            application_event_handler: Mutex::new(None),
            pending_confirmation: Mutex::new(None),
            quit_requested: AtomicBool::new(false),
            app_name,
        })
    }

    fn lock_windows(&self) -> PlatformResult<MutexGuard<'_, HashMap<WindowId, ConsoleWindowData>>> {
        self.active_windows.lock().map_err(|_| {
            log::error!("Platform: Failed to lock console windows map.");
            PlatformError::OperationFailed("Failed to lock windows map".into())
        })
    }

    fn with_window_data<R>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&mut ConsoleWindowData) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let mut windows_guard = self.lock_windows()?;
        let window_data = windows_guard.get_mut(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    fn set_event_handler(
        &self,
        handler: Option<&Arc<Mutex<dyn PlatformEventHandler>>>,
    ) -> PlatformResult<()> {
        let mut guard = self.application_event_handler.lock().map_err(|_| {
            PlatformError::OperationFailed("Failed to lock event handler field".into())
        })?;
        *guard = handler.map(Arc::downgrade);
        Ok(())
    }

    fn event_handler(&self) -> Option<Arc<Mutex<dyn PlatformEventHandler>>> {
        self.application_event_handler
            .lock()
            .ok()?
            .as_ref()
            .and_then(|weak_handler| weak_handler.upgrade())
    }

    /*
     * Delivers `event` and then executes the commands the handler enqueued,
     * one at a time, without holding the handler lock while a command runs.
     */
    pub(crate) fn send_event(self: &Arc<Self>, event: AppEvent) {
        let Some(handler_arc) = self.event_handler() else {
            log::warn!("Platform: No event handler available for {event:?}.");
            return;
        };
        match handler_arc.lock() {
            Ok(mut handler_guard) => handler_guard.handle_event(event),
            Err(_) => {
                log::error!("Platform: Event handler mutex poisoned; dropping {event:?}.");
                return;
            }
        }
        loop {
            let next_command = match handler_arc.lock() {
                Ok(mut handler_guard) => handler_guard.try_dequeue_command(),
                Err(_) => None,
            };
            let Some(command) = next_command else {
                break;
            };
            if let Err(e) = self.execute_command(command) {
                log::error!("Platform: Command failed: {e}");
            }
        }
    }

    fn create_window(&self, config: &WindowConfig) -> PlatformResult<WindowId> {
        let window_id = WindowId(self.next_window_id_counter.fetch_add(1, Ordering::Relaxed));
        self.lock_windows()?
            .insert(window_id, ConsoleWindowData::new(config.title));
        log::debug!("Platform: Created console window {window_id:?} '{}'", config.title);
        Ok(window_id)
    }

    pub(crate) fn execute_command(self: &Arc<Self>, command: PlatformCommand) -> PlatformResult<()> {
        log::trace!("Platform: Executing {command:?}");
        match command {
            PlatformCommand::SetWindowTitle { window_id, title } => {
                self.with_window_data(window_id, |window_data| {
                    window_data.title = title;
                    Ok(())
                })
            }
            PlatformCommand::ShowWindow { window_id } => self.show_window(window_id),
            PlatformCommand::CloseWindow { window_id } => {
                let removed = self.lock_windows()?.remove(&window_id);
                if removed.is_none() {
                    return Err(PlatformError::InvalidHandle(format!(
                        "WindowId {window_id:?} not found"
                    )));
                }
                self.send_event(AppEvent::WindowDestroyed { window_id });
                Ok(())
            }
            PlatformCommand::QuitApplication => {
                log::debug!("Platform: Quit requested.");
                self.quit_requested.store(true, Ordering::SeqCst);
                Ok(())
            }
            PlatformCommand::CreateLabel {
                window_id,
                control_id,
                initial_text,
                class,
            } => self.with_window_data(window_id, |window_data| {
                window_data.register_control(
                    control_id,
                    ConsoleControlKind::Label(class),
                    initial_text,
                )
            }),
            PlatformCommand::CreateInput {
                window_id,
                control_id,
                cue_banner,
            } => self.with_window_data(window_id, |window_data| {
                log::debug!("Platform: Input {} hint: '{cue_banner}'", control_id.raw());
                window_data.register_control(control_id, ConsoleControlKind::Input, String::new())
            }),
            PlatformCommand::CreateListBox {
                window_id,
                control_id,
            } => self.with_window_data(window_id, |window_data| {
                window_data.register_control(control_id, ConsoleControlKind::ListBox, String::new())
            }),
            PlatformCommand::CreateButton {
                window_id,
                control_id,
                text,
            } => self.with_window_data(window_id, |window_data| {
                window_data.register_control(control_id, ConsoleControlKind::Button, text)
            }),
            PlatformCommand::DefineLayout { window_id, rules } => {
                log::trace!(
                    "Platform: Ignoring {} layout rule(s) for console window {window_id:?}.",
                    rules.len()
                );
                Ok(())
            }
            PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
                self.send_event(AppEvent::MainWindowUISetupComplete { window_id });
                Ok(())
            }
            PlatformCommand::SetInputText {
                window_id,
                control_id,
                text,
            } => self.with_window_data(window_id, |window_data| {
                window_data.control_mut(control_id)?.text = text;
                Ok(())
            }),
            PlatformCommand::PopulateList {
                window_id,
                control_id,
                items,
            } => {
                let visible = self.with_window_data(window_id, |window_data| {
                    window_data.control_mut(control_id)?;
                    window_data.list_items = items.clone();
                    Ok(window_data.visible)
                })?;
                if visible && !items.is_empty() {
                    for (index, item) in items.iter().enumerate() {
                        println!("  #{:<3} {item}", index + 1);
                    }
                }
                Ok(())
            }
            PlatformCommand::ClearListSelection {
                window_id,
                control_id,
            } => self.with_window_data(window_id, |window_data| {
                window_data.control_mut(control_id).map(|_| ())
            }),
            PlatformCommand::SetControlEnabled {
                window_id,
                control_id,
                enabled,
            } => self.with_window_data(window_id, |window_data| {
                window_data.control_mut(control_id)?.enabled = enabled;
                Ok(())
            }),
            PlatformCommand::UpdateLabelText {
                window_id,
                control_id,
                text,
                severity,
            } => self.update_label_text(window_id, control_id, text, severity),
            PlatformCommand::StartTimer {
                window_id,
                timer_id,
                interval_ms,
            } => self.with_window_data(window_id, |window_data| {
                let interval = Duration::from_millis(u64::from(interval_ms));
                window_data.timers.insert(
                    timer_id,
                    RunningTimer {
                        deadline: Instant::now() + interval,
                        interval,
                    },
                );
                Ok(())
            }),
            PlatformCommand::StopTimer {
                window_id,
                timer_id,
            } => self.with_window_data(window_id, |window_data| {
                if window_data.timers.remove(&timer_id).is_none() {
                    log::trace!("Platform: StopTimer for {timer_id:?} which was not running.");
                }
                Ok(())
            }),
            PlatformCommand::ShowConfirmationDialog {
                window_id,
                title,
                message,
            } => {
                self.with_window_data(window_id, |_| Ok(()))?;
                println!("\n== {title} ==\n{message}\n[y/n]");
                let mut pending = self.pending_confirmation.lock().map_err(|_| {
                    PlatformError::OperationFailed("Failed to lock pending confirmation".into())
                })?;
                *pending = Some(window_id);
                Ok(())
            }
            PlatformCommand::ShowMessageDialog {
                window_id,
                title,
                message,
                severity,
            } => {
                self.with_window_data(window_id, |_| Ok(()))?;
                println!("\n== {title} ({severity:?}) ==\n{message}\n");
                Ok(())
            }
        }
    }

    fn show_window(&self, window_id: WindowId) -> PlatformResult<()> {
        let (title, items) = self.with_window_data(window_id, |window_data| {
            window_data.visible = true;
            Ok((window_data.title.clone(), window_data.list_items.clone()))
        })?;
        println!("=== {title} ===");
        println!("Type part of a file name. '#N' copies result N, ':clear' resets, ':quit' exits.");
        for (index, item) in items.iter().enumerate() {
            println!("  #{:<3} {item}", index + 1);
        }
        Ok(())
    }

    fn update_label_text(
        &self,
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        severity: MessageSeverity,
    ) -> PlatformResult<()> {
        match severity {
            MessageSeverity::Error => log::error!("Platform Status (WinID {window_id:?} ERROR): {text}"),
            MessageSeverity::Warning => log::warn!("Platform Status (WinID {window_id:?} WARN): {text}"),
            MessageSeverity::Information => {
                log::info!("Platform Status (WinID {window_id:?} INFO): {text}")
            }
        }
        let (class, visible) = self.with_window_data(window_id, |window_data| {
            let visible = window_data.visible;
            let control = window_data.control_mut(control_id)?;
            let ConsoleControlKind::Label(class) = control.kind else {
                return Err(PlatformError::InvalidHandle(format!(
                    "Control ID {} is not a label",
                    control_id.raw()
                )));
            };
            control.text = text.clone();
            Ok((class, visible))
        })?;
        if visible {
            match class {
                LabelClass::StatusBar => println!("[{severity:?}] {text}"),
                LabelClass::Default => println!("{text}"),
            }
        }
        Ok(())
    }

    fn take_pending_confirmation(&self) -> Option<WindowId> {
        self.pending_confirmation.lock().ok()?.take()
    }

    fn restore_pending_confirmation(&self, window_id: WindowId) {
        if let Ok(mut pending) = self.pending_confirmation.lock() {
            *pending = Some(window_id);
        }
    }

    // The window that receives typed lines; the console shows one at a time.
    fn focused_window(&self) -> Option<WindowId> {
        let windows_guard = self.lock_windows().ok()?;
        windows_guard
            .iter()
            .filter(|(_, window_data)| window_data.visible)
            .map(|(window_id, _)| *window_id)
            .min_by_key(|window_id| window_id.0)
    }

    /*
     * Translates one stdin line into the matching `AppEvent`.
     */
    pub(crate) fn handle_line(self: &Arc<Self>, line: &str) {
        if let Some(window_id) = self.take_pending_confirmation() {
            match parse_confirmation_answer(line) {
                Some(confirmed) => {
                    self.send_event(AppEvent::ConfirmationDialogCompleted {
                        window_id,
                        confirmed,
                    });
                }
                None => {
                    println!("Please answer 'y' or 'n'.");
                    self.restore_pending_confirmation(window_id);
                }
            }
            return;
        }

        let Some(window_id) = self.focused_window() else {
            log::debug!("Platform: No visible window for input line.");
            return;
        };

        let event = match parse_console_line(line) {
            ConsoleInput::Quit => Some(AppEvent::WindowCloseRequestedByUser { window_id }),
            ConsoleInput::Clear => self.button_event(window_id),
            ConsoleInput::Select(index) => self.selection_event(window_id, index),
            ConsoleInput::Text(text) => self.input_event(window_id, text),
        };
        if let Some(event) = event {
            self.send_event(event);
        }
    }

    fn input_event(&self, window_id: WindowId, text: String) -> Option<AppEvent> {
        let found = self
            .with_window_data(window_id, |window_data| {
                let Some((control_id, enabled)) =
                    window_data.find_control(|kind| kind == ConsoleControlKind::Input)
                else {
                    return Ok(None);
                };
                if enabled {
                    window_data.control_mut(control_id)?.text = text.clone();
                }
                Ok(Some((control_id, enabled)))
            })
            .ok()
            .flatten();
        match found {
            Some((control_id, true)) => Some(AppEvent::InputTextChanged {
                window_id,
                control_id,
                text,
            }),
            Some((_, false)) => {
                println!("(busy, input ignored)");
                None
            }
            None => None,
        }
    }

    fn button_event(&self, window_id: WindowId) -> Option<AppEvent> {
        let found = self
            .with_window_data(window_id, |window_data| {
                Ok(window_data.find_control(|kind| kind == ConsoleControlKind::Button))
            })
            .ok()
            .flatten();
        match found {
            Some((control_id, true)) => Some(AppEvent::ButtonClicked {
                window_id,
                control_id,
            }),
            Some((_, false)) => {
                println!("(busy, button ignored)");
                None
            }
            None => None,
        }
    }

    fn selection_event(&self, window_id: WindowId, index: usize) -> Option<AppEvent> {
        let found = self
            .with_window_data(window_id, |window_data| {
                Ok(window_data
                    .find_control(|kind| kind == ConsoleControlKind::ListBox)
                    .map(|(control_id, enabled)| {
                        (control_id, enabled, window_data.list_items.len())
                    }))
            })
            .ok()
            .flatten();
        match found {
            Some((control_id, true, item_count)) if index < item_count => {
                Some(AppEvent::ListSelectionChanged {
                    window_id,
                    control_id,
                    selected_index: Some(index),
                })
            }
            Some((_, true, item_count)) => {
                println!("No result #{} ({item_count} listed).", index + 1);
                None
            }
            Some((_, false, _)) => {
                println!("(busy, selection ignored)");
                None
            }
            None => None,
        }
    }

    // The earliest deadline among all running timers.
    fn next_timer_deadline(&self) -> Option<Instant> {
        let windows_guard = self.lock_windows().ok()?;
        windows_guard
            .values()
            .flat_map(|window_data| window_data.timers.values())
            .map(|timer| timer.deadline)
            .min()
    }

    /*
     * Sends `TimerElapsed` for every timer whose deadline has passed and
     * schedules its next tick.
     */
    pub(crate) fn fire_due_timers(self: &Arc<Self>, now: Instant) {
        let mut due = Vec::new();
        if let Ok(mut windows_guard) = self.lock_windows() {
            for (window_id, window_data) in windows_guard.iter_mut() {
                for (timer_id, timer) in window_data.timers.iter_mut() {
                    if timer.deadline <= now {
                        timer.deadline = now + timer.interval;
                        due.push((*window_id, *timer_id));
                    }
                }
            }
        }
        for (window_id, timer_id) in due {
            self.send_event(AppEvent::TimerElapsed {
                window_id,
                timer_id,
            });
        }
    }

    fn close_all_windows(self: &Arc<Self>) {
        let window_ids: Vec<WindowId> = match self.lock_windows() {
            Ok(windows_guard) => windows_guard.keys().copied().collect(),
            Err(_) => Vec::new(),
        };
        if window_ids.is_empty() {
            self.quit_requested.store(true, Ordering::SeqCst);
        }
        for window_id in window_ids {
            self.send_event(AppEvent::WindowCloseRequestedByUser { window_id });
        }
    }
}

fn spawn_stdin_reader() -> PlatformResult<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!("Platform: Failed to read stdin: {e}");
                        break;
                    }
                }
            }
            log::debug!("Platform: stdin closed.");
        })
        .map_err(|e| {
            PlatformError::InitializationFailed(format!("Could not start stdin reader: {e}"))
        })?;
    Ok(rx)
}

/// The primary interface to the platform abstraction layer (console backend).
pub struct PlatformInterface {
    internal_state: Arc<ConsoleInternalState>,
}

impl PlatformInterface {
    pub fn new(app_name: String) -> PlatformResult<Self> {
        log::debug!("Platform: Console backend for '{app_name}'.");
        Ok(PlatformInterface {
            internal_state: ConsoleInternalState::new(app_name),
        })
    }

    pub fn create_window(&self, config: WindowConfig) -> PlatformResult<WindowId> {
        self.internal_state.create_window(&config)
    }

    pub fn execute_command(&self, command: PlatformCommand) -> PlatformResult<()> {
        self.internal_state.execute_command(command)
    }

    /*
     * Registers the event handler, executes the initial UI description
     * commands, and then services stdin lines and timers until the
     * application quits. End of input closes every window.
     */
    pub fn run(
        &self,
        event_handler: Arc<Mutex<dyn PlatformEventHandler>>,
        initial_commands: Vec<PlatformCommand>,
    ) -> PlatformResult<()> {
        let state = &self.internal_state;
        state.set_event_handler(Some(&event_handler))?;

        for command in initial_commands {
            self.execute_command(command)?;
        }

        let mut line_rx = Some(spawn_stdin_reader()?);
        while !state.quit_requested.load(Ordering::SeqCst) {
            let next_deadline = state.next_timer_deadline();
            let wait = next_deadline
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_WAIT);

            match &line_rx {
                Some(rx) => match rx.recv_timeout(wait) {
                    Ok(line) => state.handle_line(&line),
                    Err(RecvTimeoutError::Timeout) => state.fire_due_timers(Instant::now()),
                    Err(RecvTimeoutError::Disconnected) => {
                        log::debug!("Platform: End of input, closing windows.");
                        line_rx = None;
                        state.close_all_windows();
                    }
                },
                None => {
                    if next_deadline.is_none() {
                        log::warn!(
                            "Platform: '{}' has no input and no running timers; stopping.",
                            state.app_name
                        );
                        break;
                    }
                    thread::sleep(wait);
                    state.fire_due_timers(Instant::now());
                }
            }
        }

        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        state.set_event_handler(None)?;
        log::debug!("Platform: Console loop exited cleanly.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct RecordingHandler {
        events: Vec<AppEvent>,
        commands: VecDeque<PlatformCommand>,
    }

    impl PlatformEventHandler for RecordingHandler {
        fn handle_event(&mut self, event: AppEvent) {
            self.events.push(event);
        }

        fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
            self.commands.pop_front()
        }
    }

    const INPUT_ID: ControlId = ControlId::new(10);
    const LIST_ID: ControlId = ControlId::new(11);
    const BUTTON_ID: ControlId = ControlId::new(12);

    fn setup_state() -> (
        Arc<ConsoleInternalState>,
        Arc<Mutex<RecordingHandler>>,
        WindowId,
    ) {
        let state = ConsoleInternalState::new("TestApp".into());
        let handler = Arc::new(Mutex::new(RecordingHandler::default()));
        let handler_dyn: Arc<Mutex<dyn PlatformEventHandler>> = handler.clone();
        state.set_event_handler(Some(&handler_dyn)).unwrap();

        let window_id = state
            .create_window(&WindowConfig {
                title: "Test",
                width: 100,
                height: 100,
            })
            .unwrap();
        for command in [
            PlatformCommand::CreateInput {
                window_id,
                control_id: INPUT_ID,
                cue_banner: "hint".into(),
            },
            PlatformCommand::CreateListBox {
                window_id,
                control_id: LIST_ID,
            },
            PlatformCommand::CreateButton {
                window_id,
                control_id: BUTTON_ID,
                text: "Clear".into(),
            },
            PlatformCommand::ShowWindow { window_id },
        ] {
            state.execute_command(command).unwrap();
        }
        (state, handler, window_id)
    }

    #[test]
    fn test_parse_console_line_recognizes_commands() {
        assert_eq!(parse_console_line(":clear"), ConsoleInput::Clear);
        assert_eq!(parse_console_line(" :quit "), ConsoleInput::Quit);
        assert_eq!(parse_console_line("#1"), ConsoleInput::Select(0));
        assert_eq!(parse_console_line("#12"), ConsoleInput::Select(11));
    }

    #[test]
    fn test_parse_console_line_treats_everything_else_as_text() {
        assert_eq!(parse_console_line("alpha"), ConsoleInput::Text("alpha".into()));
        assert_eq!(parse_console_line("#0"), ConsoleInput::Text("#0".into()));
        assert_eq!(parse_console_line("#abc"), ConsoleInput::Text("#abc".into()));
        assert_eq!(parse_console_line(""), ConsoleInput::Text(String::new()));
        assert_eq!(parse_console_line("part 1\r"), ConsoleInput::Text("part 1".into()));
    }

    #[test]
    fn test_parse_confirmation_answer() {
        assert_eq!(parse_confirmation_answer("y"), Some(true));
        assert_eq!(parse_confirmation_answer(" YES "), Some(true));
        assert_eq!(parse_confirmation_answer("n"), Some(false));
        assert_eq!(parse_confirmation_answer("No"), Some(false));
        assert_eq!(parse_confirmation_answer("maybe"), None);
    }

    #[test]
    fn test_text_line_sends_input_text_changed() {
        // Arrange
        let (state, handler, window_id) = setup_state();

        // Act
        state.handle_line("alpha");

        // Assert
        let events = &handler.lock().unwrap().events;
        assert_eq!(
            events.last(),
            Some(&AppEvent::InputTextChanged {
                window_id,
                control_id: INPUT_ID,
                text: "alpha".into()
            })
        );
    }

    #[test]
    fn test_select_line_only_for_listed_results() {
        // Arrange
        let (state, handler, window_id) = setup_state();
        state
            .execute_command(PlatformCommand::PopulateList {
                window_id,
                control_id: LIST_ID,
                items: vec!["a.txt".into(), "b.txt".into()],
            })
            .unwrap();

        // Act
        state.handle_line("#3");
        state.handle_line("#2");

        // Assert
        let events = &handler.lock().unwrap().events;
        assert_eq!(
            events.as_slice(),
            &[AppEvent::ListSelectionChanged {
                window_id,
                control_id: LIST_ID,
                selected_index: Some(1)
            }]
        );
    }

    #[test]
    fn test_disabled_input_ignores_lines() {
        // Arrange
        let (state, handler, window_id) = setup_state();
        state
            .execute_command(PlatformCommand::SetControlEnabled {
                window_id,
                control_id: INPUT_ID,
                enabled: false,
            })
            .unwrap();

        // Act
        state.handle_line("alpha");

        // Assert
        assert!(handler.lock().unwrap().events.is_empty());
    }

    #[test]
    fn test_confirmation_consumes_next_line() {
        // Arrange
        let (state, handler, window_id) = setup_state();
        state
            .execute_command(PlatformCommand::ShowConfirmationDialog {
                window_id,
                title: "Confirm".into(),
                message: "Continue?".into(),
            })
            .unwrap();

        // Act
        state.handle_line("perhaps");
        state.handle_line("n");
        state.handle_line(":clear");

        // Assert
        let events = &handler.lock().unwrap().events;
        assert_eq!(
            events.as_slice(),
            &[
                AppEvent::ConfirmationDialogCompleted {
                    window_id,
                    confirmed: false
                },
                AppEvent::ButtonClicked {
                    window_id,
                    control_id: BUTTON_ID
                }
            ]
        );
    }

    #[test]
    fn test_due_timer_fires_and_repeats_until_stopped() {
        // Arrange
        let (state, handler, window_id) = setup_state();
        state
            .execute_command(PlatformCommand::StartTimer {
                window_id,
                timer_id: TimerId::SearchDebounce,
                interval_ms: 10,
            })
            .unwrap();
        let later = Instant::now() + Duration::from_millis(50);

        // Act
        state.fire_due_timers(Instant::now() - Duration::from_millis(1));
        state.fire_due_timers(later);
        state
            .execute_command(PlatformCommand::StopTimer {
                window_id,
                timer_id: TimerId::SearchDebounce,
            })
            .unwrap();
        state.fire_due_timers(later + Duration::from_secs(1));

        // Assert
        let events = &handler.lock().unwrap().events;
        assert_eq!(
            events.as_slice(),
            &[AppEvent::TimerElapsed {
                window_id,
                timer_id: TimerId::SearchDebounce
            }]
        );
        assert_eq!(state.next_timer_deadline(), None);
    }

    #[test]
    fn test_close_window_sends_destroyed() {
        // Arrange
        let (state, handler, window_id) = setup_state();

        // Act
        state
            .execute_command(PlatformCommand::CloseWindow { window_id })
            .unwrap();

        // Assert
        assert_eq!(
            handler.lock().unwrap().events.last(),
            Some(&AppEvent::WindowDestroyed { window_id })
        );
        assert!(state.focused_window().is_none());
    }
}
