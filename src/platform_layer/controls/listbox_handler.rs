/*
 * Encapsulates Win32-specific operations for list box controls: creation,
 * replacing the items, clearing the selection, and translating LBN_SELCHANGE
 * into `AppEvent::ListSelectionChanged`.
 */

use crate::platform_layer::app::Win32ApiInternalState;
use crate::platform_layer::error::{PlatformError, Result as PlatformResult};
use crate::platform_layer::types::{AppEvent, ControlId, WindowId};
use crate::platform_layer::window_common::{self, ControlKind, WC_LISTBOX};

use std::sync::Arc;
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, WPARAM},
        Graphics::Gdi::InvalidateRect,
        UI::WindowsAndMessaging::{
            LB_ADDSTRING, LB_ERR, LB_ERRSPACE, LB_GETCURSEL, LB_RESETCONTENT, LB_SETCURSEL,
            LBS_NOINTEGRALHEIGHT, LBS_NOTIFY, SendMessageW, WINDOW_STYLE, WM_SETREDRAW,
            WS_EX_CLIENTEDGE, WS_TABSTOP, WS_VSCROLL,
        },
    },
    core::HSTRING,
};

pub(crate) fn handle_create_listbox_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
) -> PlatformResult<()> {
    log::debug!(
        "ListBoxHandler: handle_create_listbox_command for WinID {window_id:?}, ControlID {}",
        control_id.raw()
    );
    // No LBS_SORT: items keep the order the application logic supplies.
    window_common::create_child_control(
        internal_state,
        window_id,
        control_id,
        ControlKind::ListBox,
        WC_LISTBOX,
        "",
        WS_EX_CLIENTEDGE,
        WS_TABSTOP
            | WS_VSCROLL
            | WINDOW_STYLE((LBS_NOTIFY | LBS_NOINTEGRALHEIGHT) as u32),
    )?;
    Ok(())
}

/*
 * Replaces the content of the list box with `items`, in order. Redraw is
 * suspended while the items are added.
 */
pub(crate) fn handle_populate_list_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    items: Vec<String>,
) -> PlatformResult<()> {
    let hwnd_list = internal_state.with_window_data_read(window_id, |window_data| {
        window_data.require_control(control_id, ControlKind::ListBox)
    })?;
    log::debug!(
        "ListBoxHandler: Populating list {} with {} item(s).",
        control_id.raw(),
        items.len()
    );

    unsafe {
        SendMessageW(hwnd_list, WM_SETREDRAW, Some(WPARAM(0)), Some(LPARAM(0)));
        SendMessageW(hwnd_list, LB_RESETCONTENT, Some(WPARAM(0)), Some(LPARAM(0)));
    }

    let mut add_result = Ok(());
    for item in &items {
        let item_hstring = HSTRING::from(item.as_str());
        let index = unsafe {
            SendMessageW(
                hwnd_list,
                LB_ADDSTRING,
                Some(WPARAM(0)),
                Some(LPARAM(item_hstring.as_ptr() as isize)),
            )
        };
        if index.0 == LB_ERR as isize || index.0 == LB_ERRSPACE as isize {
            add_result = Err(PlatformError::OperationFailed(format!(
                "LB_ADDSTRING failed for '{item}' in list {}",
                control_id.raw()
            )));
            break;
        }
    }

    unsafe {
        SendMessageW(hwnd_list, WM_SETREDRAW, Some(WPARAM(1)), Some(LPARAM(0)));
        let _ = InvalidateRect(Some(hwnd_list), None, true);
    }
    add_result
}

pub(crate) fn handle_clear_selection_command(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
) -> PlatformResult<()> {
    let hwnd_list = internal_state.with_window_data_read(window_id, |window_data| {
        window_data.require_control(control_id, ControlKind::ListBox)
    })?;
    // LB_SETCURSEL does not raise LBN_SELCHANGE, so no event comes back.
    unsafe {
        SendMessageW(
            hwnd_list,
            LB_SETCURSEL,
            Some(WPARAM(usize::MAX)),
            Some(LPARAM(0)),
        )
    };
    Ok(())
}

/*
 * Translates an LBN_SELCHANGE notification into an
 * `AppEvent::ListSelectionChanged` with the newly selected index.
 */
pub(crate) fn handle_lbn_selchange(
    window_id: WindowId,
    control_id: ControlId,
    hwnd_list: HWND,
) -> AppEvent {
    let current = unsafe { SendMessageW(hwnd_list, LB_GETCURSEL, Some(WPARAM(0)), Some(LPARAM(0))) };
    let selected_index = usize::try_from(current.0).ok();
    log::debug!(
        "ListBoxHandler: LBN_SELCHANGE for ID {} in WinID {window_id:?}, index {selected_index:?}",
        control_id.raw()
    );
    AppEvent::ListSelectionChanged {
        window_id,
        control_id,
        selected_index,
    }
}
