/*
 * This module is responsible for modal dialogs. Confirmations are Yes/No
 * message boxes whose answer is sent back to the application logic as
 * `AppEvent::ConfirmationDialogCompleted`; message dialogs are plain OK boxes
 * with an icon matching the severity.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{AppEvent, MessageSeverity, WindowId};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::HWND,
        UI::WindowsAndMessaging::{
            IDYES, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONQUESTION, MB_ICONWARNING, MB_OK,
            MB_YESNO, MESSAGEBOX_STYLE, MessageBoxW,
        },
    },
    core::HSTRING,
};

/*
 * Retrieves the owner HWND for a given WindowId, rejecting windows whose
 * native handle has not been set (or is gone).
 */
pub(crate) fn get_hwnd_owner(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<HWND> {
    internal_state.with_window_data_read(window_id, |window_data| {
        let hwnd = window_data.get_hwnd();
        if hwnd.is_invalid() {
            log::warn!("get_hwnd_owner found an invalid HWND for WindowId {window_id:?}");
            return Err(PlatformError::InvalidHandle(format!(
                "HWND for WindowId {window_id:?} is invalid"
            )));
        }
        Ok(hwnd)
    })
}

fn severity_icon(severity: MessageSeverity) -> MESSAGEBOX_STYLE {
    match severity {
        MessageSeverity::Information => MB_ICONINFORMATION,
        MessageSeverity::Warning => MB_ICONWARNING,
        MessageSeverity::Error => MB_ICONERROR,
    }
}

/*
 * Shows a modal Yes/No question. The message box runs its own message loop,
 * so timers and other window messages keep being delivered while it is open.
 */
pub(crate) fn handle_show_confirmation_dialog_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: String,
    message: String,
) -> PlatformResult<()> {
    let hwnd_owner = get_hwnd_owner(internal_state, window_id)?;
    log::debug!("DialogHandler: Showing confirmation '{title}' for WinID {window_id:?}");

    let result = unsafe {
        MessageBoxW(
            Some(hwnd_owner),
            &HSTRING::from(message),
            &HSTRING::from(title),
            MB_YESNO | MB_ICONQUESTION,
        )
    };
    if result.0 == 0 {
        return Err(PlatformError::OperationFailed(format!(
            "MessageBoxW failed: {:?}",
            windows::core::Error::from_win32()
        )));
    }
    let confirmed = result == IDYES;
    log::debug!("DialogHandler: Confirmation answered, confirmed = {confirmed}");

    internal_state.send_event(AppEvent::ConfirmationDialogCompleted {
        window_id,
        confirmed,
    });
    Ok(())
}

pub(crate) fn handle_show_message_dialog_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: String,
    message: String,
    severity: MessageSeverity,
) -> PlatformResult<()> {
    let hwnd_owner = get_hwnd_owner(internal_state, window_id)?;
    log::debug!("DialogHandler: Showing {severity:?} dialog '{title}' for WinID {window_id:?}");

    let result = unsafe {
        MessageBoxW(
            Some(hwnd_owner),
            &HSTRING::from(message),
            &HSTRING::from(title),
            MB_OK | severity_icon(severity),
        )
    };
    if result.0 == 0 {
        return Err(PlatformError::OperationFailed(format!(
            "MessageBoxW failed: {:?}",
            windows::core::Error::from_win32()
        )));
    }
    Ok(())
}
