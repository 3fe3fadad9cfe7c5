/*
 * This module is responsible for handling platform-specific logic related to
 * label controls (STATIC controls in Win32). It encapsulates the creation,
 * updating, and severity-based coloring of labels.
 *
 * Status updates are logged here at a level derived from their severity, so
 * every message the operator sees also lands in the log.
 */

use crate::platform_layer::{
    app::Win32ApiInternalState,
    error::{PlatformError, Result as PlatformResult},
    types::{ControlId, LabelClass, MessageSeverity, WindowId},
    window_common::{self, ControlKind, SS_LEFT, WC_STATIC},
};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{COLORREF, GetLastError, HWND, LRESULT},
        Graphics::Gdi::{
            COLOR_WINDOW, COLOR_WINDOWTEXT, GetSysColor, GetSysColorBrush, HBRUSH, HDC,
            InvalidateRect, SetBkMode, SetTextColor, TRANSPARENT,
        },
        UI::WindowsAndMessaging::{GetDlgCtrlID, SetWindowTextW, WINDOW_EX_STYLE},
    },
    core::HSTRING,
};

/*
 * Handles the creation of a native label (STATIC) control. Status bar labels
 * start with `Information` severity so they are colored from the first paint.
 */
pub(crate) fn handle_create_label_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    label_id: ControlId,
    initial_text: String,
    class: LabelClass,
) -> PlatformResult<()> {
    log::debug!(
        "LabelHandler: handle_create_label_command for WinID {window_id:?}, LabelID: {}, Text: '{initial_text}', Class: {class:?}",
        label_id.raw()
    );

    window_common::create_child_control(
        internal_state,
        window_id,
        label_id,
        ControlKind::Label,
        WC_STATIC,
        &initial_text,
        WINDOW_EX_STYLE(0),
        SS_LEFT,
    )?;

    if class == LabelClass::StatusBar {
        internal_state.with_window_data_write(window_id, |window_data| {
            window_data.set_label_severity(label_id, MessageSeverity::Information);
            Ok(())
        })?;
    }
    Ok(())
}

/*
 * Handles the update of a label's text and its associated severity.
 * The write lock is released before `SetWindowTextW`, which can dispatch
 * WM_CTLCOLORSTATIC synchronously and would otherwise re-enter the lock.
 */
pub(crate) fn handle_update_label_text_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    label_id: ControlId,
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

    let hwnd_label = internal_state.with_window_data_write(window_id, |window_data| {
        let hwnd = window_data.require_control(label_id, ControlKind::Label)?;
        window_data.set_label_severity(label_id, severity);
        Ok(hwnd)
    })?;

    unsafe {
        if SetWindowTextW(hwnd_label, &HSTRING::from(text.as_str())).is_err() {
            let last_error = GetLastError();
            log::error!(
                "LabelHandler: SetWindowTextW for label ID {} failed: {last_error:?}",
                label_id.raw()
            );
            return Err(PlatformError::OperationFailed(format!(
                "SetWindowTextW for label ID {} failed: {last_error:?}",
                label_id.raw()
            )));
        }
        // Repaint so WM_CTLCOLORSTATIC picks up the new severity color.
        let _ = InvalidateRect(Some(hwnd_label), None, true);
    }
    Ok(())
}

fn severity_text_color(severity: MessageSeverity) -> COLORREF {
    match severity {
        MessageSeverity::Error => COLORREF(0x000000FF), // Red
        MessageSeverity::Warning => COLORREF(0x0000A5FF), // Orange-ish
        MessageSeverity::Information => COLORREF(unsafe { GetSysColor(COLOR_WINDOWTEXT) }),
    }
}

/*
 * Handles WM_CTLCOLORSTATIC for labels that carry a severity. Returns `None`
 * for other STATIC controls so the system draws them.
 */
pub(crate) fn handle_wm_ctlcolorstatic(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    hdc_static_ctrl: HDC,
    hwnd_static_ctrl: HWND,
) -> Option<LRESULT> {
    let raw_id = unsafe { GetDlgCtrlID(hwnd_static_ctrl) };
    if raw_id == 0 {
        return None;
    }
    let control_id = ControlId::new(raw_id);

    let severity = internal_state
        .with_window_data_read(window_id, |window_data| {
            Ok(window_data.get_label_severity(control_id))
        })
        .ok()
        .flatten()?;

    unsafe {
        SetTextColor(hdc_static_ctrl, severity_text_color(severity));
        SetBkMode(hdc_static_ctrl, TRANSPARENT);
        let brush: HBRUSH = GetSysColorBrush(COLOR_WINDOW);
        Some(LRESULT(brush.0 as isize))
    }
}
