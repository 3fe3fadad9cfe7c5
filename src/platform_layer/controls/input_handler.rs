/*
 * Provides handling for input (EDIT) controls: creation with a cue banner,
 * programmatic text updates, and translation of EN_CHANGE notifications into
 * `AppEvent::InputTextChanged` carrying the full current text.
 */

use crate::platform_layer::PlatformResult;
use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::PlatformError;
use crate::platform_layer::types::{AppEvent, ControlId, WindowId};
use crate::platform_layer::window_common::{self, ControlKind, WC_EDIT};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, WPARAM},
        UI::{
            Controls::EM_SETCUEBANNER,
            WindowsAndMessaging::{
                ES_AUTOHSCROLL, GetWindowTextLengthW, GetWindowTextW, SendMessageW,
                SetWindowTextW, WINDOW_STYLE, WS_EX_CLIENTEDGE, WS_TABSTOP,
            },
        },
    },
    core::HSTRING,
};

pub(crate) fn handle_create_input_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    cue_banner: String,
) -> PlatformResult<()> {
    log::debug!(
        "InputHandler: handle_create_input_command for WinID {window_id:?}, ControlID {}",
        control_id.raw()
    );
    let hwnd_edit = window_common::create_child_control(
        internal_state,
        window_id,
        control_id,
        ControlKind::Input,
        WC_EDIT,
        "",
        WS_EX_CLIENTEDGE,
        WS_TABSTOP | WINDOW_STYLE(ES_AUTOHSCROLL as u32),
    )?;

    if !cue_banner.is_empty() {
        let banner = HSTRING::from(cue_banner.as_str());
        // WPARAM(1): keep showing the banner while the control has focus.
        unsafe {
            SendMessageW(
                hwnd_edit,
                EM_SETCUEBANNER,
                Some(WPARAM(1)),
                Some(LPARAM(banner.as_ptr() as isize)),
            )
        };
    }
    Ok(())
}

/*
 * Replaces the text of an input control. The window map lock is released
 * before `SetWindowTextW`, which raises EN_CHANGE synchronously.
 */
pub(crate) fn handle_set_input_text_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    text: String,
) -> PlatformResult<()> {
    let hwnd_edit = internal_state.with_window_data_read(window_id, |window_data| {
        window_data.require_control(control_id, ControlKind::Input)
    })?;
    unsafe { SetWindowTextW(hwnd_edit, &HSTRING::from(text.as_str())) }.map_err(|e| {
        log::error!(
            "InputHandler: SetWindowTextW for control {} failed: {e:?}",
            control_id.raw()
        );
        PlatformError::OperationFailed(format!(
            "SetWindowTextW for control {} failed: {e}",
            control_id.raw()
        ))
    })
}

/*
 * Translates an EN_CHANGE notification into an `AppEvent::InputTextChanged`
 * with the control's complete text.
 */
pub(crate) fn handle_en_change(
    window_id: WindowId,
    control_id: ControlId,
    hwnd_edit: HWND,
) -> Option<AppEvent> {
    let text = read_window_text(hwnd_edit);
    log::trace!(
        "InputHandler: EN_CHANGE for ID {} in WinID {window_id:?}: '{text}'",
        control_id.raw()
    );
    Some(AppEvent::InputTextChanged {
        window_id,
        control_id,
        text,
    })
}

fn read_window_text(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buffer: Vec<u16> = vec![0; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
}
