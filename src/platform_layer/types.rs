/*
 * This module defines core data types used for communication between the
 * application logic and the platform layer. It includes identifiers for
 * windows, controls and timers, the layout primitives used to place controls,
 * platform-agnostic event types (`AppEvent`), commands for the platform layer
 * (`PlatformCommand`), and severity levels for messages (`MessageSeverity`).
 * It also defines the `PlatformEventHandler` trait that the application logic
 * must implement.
 */

// An opaque identifier for a native window, managed by the platform layer.
//
// The application logic layer uses this ID to refer to specific windows
// when sending commands or receiving events, without needing to know about
// native window handles like HWND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

/*
 * A logical identifier for a control inside a window. The values are chosen
 * by the UI description (see `ui_constants`) and the platform layer maps them
 * to native handles. On Win32 the raw value doubles as the child window ID.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(i32);

impl ControlId {
    pub const fn new(raw: i32) -> Self {
        ControlId(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

/*
 * The timers the application logic can start. Each timer is identified per
 * window; starting a timer that is already running restarts it.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    // Fires once the input has been quiet for the debounce delay.
    SearchDebounce,
    // Periodic tick while a copy runs in the background.
    CopyProgressPoll,
}

impl TimerId {
    pub const fn raw(self) -> usize {
        match self {
            TimerId::SearchDebounce => 1,
            TimerId::CopyProgressPoll => 2,
        }
    }

    pub fn from_raw(raw: usize) -> Option<Self> {
        match raw {
            1 => Some(TimerId::SearchDebounce),
            2 => Some(TimerId::CopyProgressPoll),
            _ => None,
        }
    }
}

// Configuration for creating a new native window.
#[derive(Debug, Clone)]
pub struct WindowConfig<'a> {
    pub title: &'a str,
    pub width: i32,
    pub height: i32,
}

// --- Layout Primitives ---

/*
 * Defines how a control docks within the window's client area. Top and bottom
 * docks are stacked in rule order; `Fill` takes whatever is left.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStyle {
    Top,
    Bottom,
    Fill,
}

/*
 * A rule that associates a control with a docking style. Rules are applied in
 * ascending `order`. `fixed_size` is the height of a Top/Bottom control and is
 * ignored for Fill.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRule {
    pub control_id: ControlId,
    pub dock_style: DockStyle,
    pub order: u32,
    pub fixed_size: Option<i32>,
    pub margin: (i32, i32, i32, i32), // (top, right, bottom, left)
}

// --- Events from Platform to App Logic ---

/*
 * Represents platform-agnostic UI events generated by the native toolkit.
 *
 * The platform layer translates native OS events into these types and
 * sends them to the application logic layer for handling.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // Signals that the initial static UI setup for the main window is complete.
    MainWindowUISetupComplete {
        window_id: WindowId,
    },
    WindowCloseRequestedByUser {
        window_id: WindowId,
    },
    // Signals that a window and its native resources have been destroyed.
    // The `WindowId` should be considered invalid after this event.
    WindowDestroyed {
        window_id: WindowId,
    },
    // The full current text of an input control, sent on every edit.
    InputTextChanged {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    // `None` means the selection was removed.
    ListSelectionChanged {
        window_id: WindowId,
        control_id: ControlId,
        selected_index: Option<usize>,
    },
    ButtonClicked {
        window_id: WindowId,
        control_id: ControlId,
    },
    TimerElapsed {
        window_id: WindowId,
        timer_id: TimerId,
    },
    ConfirmationDialogCompleted {
        window_id: WindowId,
        confirmed: bool,
    },
}

// Defines the severity of a message shown to the user, in a label or a dialog.
// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

// --- Label Classification ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClass {
    Default,
    StatusBar,
}

// Represents platform-agnostic commands sent from the application logic to the platform layer.
//
// These commands instruct the platform layer to perform specific actions on
// native UI elements.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCommand {
    SetWindowTitle {
        window_id: WindowId,
        title: String,
    },
    ShowWindow {
        window_id: WindowId,
    },
    CloseWindow {
        window_id: WindowId,
    },
    QuitApplication,
    CreateLabel {
        window_id: WindowId,
        control_id: ControlId,
        initial_text: String,
        class: LabelClass,
    },
    // `cue_banner` is placeholder text drawn by the control while it is empty.
    // It is never part of the control's text.
    CreateInput {
        window_id: WindowId,
        control_id: ControlId,
        cue_banner: String,
    },
    CreateListBox {
        window_id: WindowId,
        control_id: ControlId,
    },
    CreateButton {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    DefineLayout {
        window_id: WindowId,
        rules: Vec<LayoutRule>,
    },
    // Signals to the platform layer that all initial UI description commands
    // for the main window have been enqueued and processed.
    SignalMainWindowUISetupComplete {
        window_id: WindowId,
    },
    SetInputText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    // Replaces the whole content of a list box.
    PopulateList {
        window_id: WindowId,
        control_id: ControlId,
        items: Vec<String>,
    },
    ClearListSelection {
        window_id: WindowId,
        control_id: ControlId,
    },
    SetControlEnabled {
        window_id: WindowId,
        control_id: ControlId,
        enabled: bool,
    },
    UpdateLabelText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        severity: MessageSeverity,
    },
    StartTimer {
        window_id: WindowId,
        timer_id: TimerId,
        interval_ms: u32,
    },
    StopTimer {
        window_id: WindowId,
        timer_id: TimerId,
    },
    // Yes/No question. The answer arrives as `AppEvent::ConfirmationDialogCompleted`.
    ShowConfirmationDialog {
        window_id: WindowId,
        title: String,
        message: String,
    },
    ShowMessageDialog {
        window_id: WindowId,
        title: String,
        message: String,
        severity: MessageSeverity,
    },
}

// --- Trait for App Logic to Handle Events ---

// A trait to be implemented by the application logic layer to handle UI events.
//
// The platform layer calls methods on this trait to notify the application
// logic about user interactions or system events.
pub trait PlatformEventHandler: Send + Sync + 'static {
    // Called by the platform layer when a native UI event has been processed.
    // The implementor should handle the event and enqueue `PlatformCommand`s
    // for the platform layer to execute.
    fn handle_event(&mut self, event: AppEvent);

    // Called by the platform layer when the application is about to exit its main loop.
    fn on_quit(&mut self) {}

    // Attempts to dequeue a single `PlatformCommand` from the internal queue.
    // This is called by the platform layer's run loop.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_id_raw_roundtrip() {
        for timer_id in [TimerId::SearchDebounce, TimerId::CopyProgressPoll] {
            assert_eq!(TimerId::from_raw(timer_id.raw()), Some(timer_id));
        }
        assert_eq!(TimerId::from_raw(0), None);
        assert_eq!(TimerId::from_raw(99), None);
    }

    #[test]
    fn test_message_severity_ordering() {
        assert!(MessageSeverity::Information < MessageSeverity::Warning);
        assert!(MessageSeverity::Warning < MessageSeverity::Error);
    }
}
