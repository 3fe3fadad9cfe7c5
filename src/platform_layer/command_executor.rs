/*
 * This module is responsible for executing `PlatformCommand`s. It routes each
 * command to the function that performs it, either here or in the control
 * handlers, so that the window procedure and `PlatformInterface` stay small.
 */

use super::app::Win32ApiInternalState;
use super::controls::{
    button_handler, dialog_handler, input_handler, label_handler, listbox_handler,
};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, ControlId, LayoutRule, PlatformCommand, TimerId, WindowId};
use super::window_common;

use std::sync::Arc;
use windows::Win32::UI::{
    Input::KeyboardAndMouse::EnableWindow,
    WindowsAndMessaging::{KillTimer, PostQuitMessage, SetTimer},
};

pub(crate) fn execute_command(
    internal_state: &Arc<Win32ApiInternalState>,
    command: PlatformCommand,
) -> PlatformResult<()> {
    log::trace!("CommandExecutor: {command:?}");
    match command {
        PlatformCommand::SetWindowTitle { window_id, title } => {
            window_common::set_window_title(internal_state, window_id, &title)
        }
        PlatformCommand::ShowWindow { window_id } => {
            window_common::show_window(internal_state, window_id)
        }
        PlatformCommand::CloseWindow { window_id } => {
            window_common::destroy_native_window(internal_state, window_id)
        }
        PlatformCommand::QuitApplication => execute_quit_application(),
        PlatformCommand::CreateLabel {
            window_id,
            control_id,
            initial_text,
            class,
        } => label_handler::handle_create_label_command(
            internal_state,
            window_id,
            control_id,
            initial_text,
            class,
        ),
        PlatformCommand::CreateInput {
            window_id,
            control_id,
            cue_banner,
        } => input_handler::handle_create_input_command(
            internal_state,
            window_id,
            control_id,
            cue_banner,
        ),
        PlatformCommand::CreateListBox {
            window_id,
            control_id,
        } => listbox_handler::handle_create_listbox_command(internal_state, window_id, control_id),
        PlatformCommand::CreateButton {
            window_id,
            control_id,
            text,
        } => button_handler::handle_create_button_command(
            internal_state,
            window_id,
            control_id,
            text,
        ),
        PlatformCommand::DefineLayout { window_id, rules } => {
            execute_define_layout(internal_state, window_id, rules)
        }
        PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
            execute_signal_main_window_ui_setup_complete(internal_state, window_id)
        }
        PlatformCommand::SetInputText {
            window_id,
            control_id,
            text,
        } => input_handler::handle_set_input_text_command(
            internal_state,
            window_id,
            control_id,
            text,
        ),
        PlatformCommand::PopulateList {
            window_id,
            control_id,
            items,
        } => listbox_handler::handle_populate_list_command(
            internal_state,
            window_id,
            control_id,
            items,
        ),
        PlatformCommand::ClearListSelection {
            window_id,
            control_id,
        } => listbox_handler::handle_clear_selection_command(internal_state, window_id, control_id),
        PlatformCommand::SetControlEnabled {
            window_id,
            control_id,
            enabled,
        } => execute_set_control_enabled(internal_state, window_id, control_id, enabled),
        PlatformCommand::UpdateLabelText {
            window_id,
            control_id,
            text,
            severity,
        } => label_handler::handle_update_label_text_command(
            internal_state,
            window_id,
            control_id,
            text,
            severity,
        ),
        PlatformCommand::StartTimer {
            window_id,
            timer_id,
            interval_ms,
        } => execute_start_timer(internal_state, window_id, timer_id, interval_ms),
        PlatformCommand::StopTimer {
            window_id,
            timer_id,
        } => execute_stop_timer(internal_state, window_id, timer_id),
        PlatformCommand::ShowConfirmationDialog {
            window_id,
            title,
            message,
        } => dialog_handler::handle_show_confirmation_dialog_command(
            internal_state,
            window_id,
            title,
            message,
        ),
        PlatformCommand::ShowMessageDialog {
            window_id,
            title,
            message,
            severity,
        } => dialog_handler::handle_show_message_dialog_command(
            internal_state,
            window_id,
            title,
            message,
            severity,
        ),
    }
}

/*
 * Stores the layout rules for the window and applies them immediately to
 * the current client area; later resizes re-apply them on WM_SIZE.
 */
fn execute_define_layout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    rules: Vec<LayoutRule>,
) -> PlatformResult<()> {
    log::debug!(
        "CommandExecutor: execute_define_layout for WinID {window_id:?}, with {} rules.",
        rules.len()
    );
    internal_state.with_window_data_write(window_id, |window_data| {
        window_data.set_layout_rules(rules);
        Ok(())
    })?;
    window_common::relayout(internal_state, window_id)
}

/*
 * Posts a `WM_QUIT` message, which ends the message loop in
 * `PlatformInterface::run`.
 */
fn execute_quit_application() -> PlatformResult<()> {
    log::debug!("CommandExecutor: execute_quit_application. Posting WM_QUIT.");
    unsafe { PostQuitMessage(0) };
    Ok(())
}

/*
 * Notifies the application logic that the static UI exists, so it can load
 * its data and populate the controls.
 */
fn execute_signal_main_window_ui_setup_complete(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    log::debug!(
        "CommandExecutor: execute_signal_main_window_ui_setup_complete for window_id: {window_id:?}"
    );
    internal_state.send_event(AppEvent::MainWindowUISetupComplete { window_id });
    Ok(())
}

fn execute_set_control_enabled(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    enabled: bool,
) -> PlatformResult<()> {
    let hwnd_ctrl = internal_state.with_window_data_read(window_id, |window_data| {
        window_data.get_control_hwnd(control_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!(
                "Control ID {} not found in window {window_id:?}",
                control_id.raw()
            ))
        })
    })?;
    unsafe {
        let _ = EnableWindow(hwnd_ctrl, enabled);
    }
    log::debug!(
        "CommandExecutor: Control ID {} in window {window_id:?} set to enabled: {enabled}",
        control_id.raw()
    );
    Ok(())
}

/*
 * Starts (or restarts) a window timer. Win32 timers repeat until killed;
 * the application logic stops the timer when it no longer wants ticks.
 */
fn execute_start_timer(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    timer_id: TimerId,
    interval_ms: u32,
) -> PlatformResult<()> {
    let hwnd = internal_state.with_window_data_read(window_id, |window_data| {
        Ok(window_data.get_hwnd())
    })?;
    let result = unsafe { SetTimer(Some(hwnd), timer_id.raw(), interval_ms, None) };
    if result == 0 {
        return Err(PlatformError::OperationFailed(format!(
            "SetTimer for {timer_id:?} failed: {:?}",
            windows::core::Error::from_win32()
        )));
    }
    log::trace!("CommandExecutor: Timer {timer_id:?} started with {interval_ms} ms.");
    Ok(())
}

fn execute_stop_timer(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    timer_id: TimerId,
) -> PlatformResult<()> {
    let hwnd = internal_state.with_window_data_read(window_id, |window_data| {
        Ok(window_data.get_hwnd())
    })?;
    // Killing a timer that is not running fails harmlessly.
    if unsafe { KillTimer(Some(hwnd), timer_id.raw()) }.is_err() {
        log::trace!("CommandExecutor: Timer {timer_id:?} was not running.");
    }
    Ok(())
}
