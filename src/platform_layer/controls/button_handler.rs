/*
 * Encapsulates Win32-specific operations for button controls.
 * Provides creation of push buttons and translation of button click
 * notifications into platform-agnostic `AppEvent`s.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::Result as PlatformResult;
use crate::platform_layer::types::{AppEvent, ControlId, WindowId};
use crate::platform_layer::window_common::{self, ControlKind, WC_BUTTON};

use std::sync::Arc;
use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{BS_PUSHBUTTON, WINDOW_EX_STYLE, WINDOW_STYLE, WS_TABSTOP},
};

/*
 * Creates a native push button and registers the resulting HWND in the
 * window's `NativeWindowData`. Fails if the window is unknown or the control
 * ID is already in use.
 */
pub(crate) fn handle_create_button_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    text: String,
) -> PlatformResult<()> {
    log::debug!(
        "ButtonHandler: handle_create_button_command for WinID {window_id:?}, ControlID {}, Text: '{text}'",
        control_id.raw()
    );
    window_common::create_child_control(
        internal_state,
        window_id,
        control_id,
        ControlKind::Button,
        WC_BUTTON,
        &text,
        WINDOW_EX_STYLE(0),
        WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32),
    )?;
    Ok(())
}

/*
 * Translates a BN_CLICKED notification into an `AppEvent::ButtonClicked`.
 */
pub(crate) fn handle_bn_clicked(
    window_id: WindowId,
    control_id: ControlId,
    hwnd_control: HWND,
) -> AppEvent {
    log::debug!(
        "ButtonHandler: BN_CLICKED for ID {} (HWND {hwnd_control:?}) in WinID {window_id:?}",
        control_id.raw()
    );
    AppEvent::ButtonClicked {
        window_id,
        control_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_bn_clicked_returns_event() {
        // Arrange
        let win_id = WindowId(1);
        let hwnd = HWND(0x1234 as _);

        // Act
        let evt = handle_bn_clicked(win_id, ControlId::new(42), hwnd);

        // Assert
        assert_eq!(
            evt,
            AppEvent::ButtonClicked {
                window_id: win_id,
                control_id: ControlId::new(42)
            }
        );
    }

    #[test]
    fn test_create_button_missing_window_returns_error() {
        // Arrange
        let state = Win32ApiInternalState::new("TestApp".into()).unwrap();
        let win_id = state.generate_window_id();
        // No window data is inserted for win_id.

        // Act
        let result =
            handle_create_button_command(&state, win_id, ControlId::new(1), "Test".into());

        // Assert
        assert!(result.is_err());
    }
}
