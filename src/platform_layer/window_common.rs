use super::app::Win32ApiInternalState;
use super::controls::{button_handler, input_handler, label_handler, listbox_handler};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, ControlId, DockStyle, LayoutRule, MessageSeverity, TimerId, WindowId};

use windows::{
    Win32::{
        Foundation::{GetLastError, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{
            CLIP_DEFAULT_PRECIS, COLOR_WINDOW, CreateFontW, DEFAULT_CHARSET, DEFAULT_QUALITY,
            DeleteObject, FF_DONTCARE, FW_NORMAL, GetDC, GetDeviceCaps, HBRUSH, HDC, HFONT,
            HGDIOBJ, LOGPIXELSY, OUT_DEFAULT_PRECIS, ReleaseDC,
        },
        UI::WindowsAndMessaging::*,
    },
    core::{HSTRING, PCWSTR, w},
};

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Arc;

pub(crate) const WC_BUTTON: PCWSTR = w!("BUTTON");
pub(crate) const WC_STATIC: PCWSTR = w!("STATIC");
pub(crate) const WC_EDIT: PCWSTR = w!("EDIT");
pub(crate) const WC_LISTBOX: PCWSTR = w!("LISTBOX");
pub(crate) const SS_LEFT: WINDOW_STYLE = WINDOW_STYLE(0);

// Point size of the font used by all controls; large enough for touch use.
const CONTROL_FONT_POINT_SIZE: i32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlKind {
    Label,
    Input,
    ListBox,
    Button,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct NativeControl {
    pub(crate) hwnd: HWND,
    pub(crate) kind: ControlKind,
}

/// Holds native data associated with a specific window managed by the platform layer.
#[derive(Debug)]
pub(crate) struct NativeWindowData {
    this_window_hwnd: HWND,
    logical_window_id: WindowId,
    controls: HashMap<ControlId, NativeControl>,
    layout_rules: Option<Vec<LayoutRule>>,
    label_severities: HashMap<ControlId, MessageSeverity>,
    control_font: Option<HFONT>,
}

impl NativeWindowData {
    pub(crate) fn new(logical_window_id: WindowId) -> Self {
        NativeWindowData {
            this_window_hwnd: HWND(std::ptr::null_mut()),
            logical_window_id,
            controls: HashMap::new(),
            layout_rules: None,
            label_severities: HashMap::new(),
            control_font: None,
        }
    }

    pub(crate) fn get_hwnd(&self) -> HWND {
        self.this_window_hwnd
    }

    pub(crate) fn set_hwnd(&mut self, hwnd: HWND) {
        self.this_window_hwnd = hwnd;
    }

    pub(crate) fn get_control_font(&self) -> Option<HFONT> {
        self.control_font
    }

    pub(crate) fn set_control_font(&mut self, font: HFONT) {
        self.control_font = Some(font);
    }

    pub(crate) fn has_control(&self, control_id: ControlId) -> bool {
        self.controls.contains_key(&control_id)
    }

    pub(crate) fn get_control_hwnd(&self, control_id: ControlId) -> Option<HWND> {
        self.controls.get(&control_id).map(|control| control.hwnd)
    }

    pub(crate) fn get_control_kind(&self, control_id: ControlId) -> Option<ControlKind> {
        self.controls.get(&control_id).map(|control| control.kind)
    }

    /*
     * Looks up a control and checks that it is of the expected kind, so that a
     * command aimed at the wrong control fails instead of sending it a
     * meaningless message.
     */
    pub(crate) fn require_control(
        &self,
        control_id: ControlId,
        expected: ControlKind,
    ) -> PlatformResult<HWND> {
        match self.controls.get(&control_id) {
            Some(control) if control.kind == expected => Ok(control.hwnd),
            Some(control) => Err(PlatformError::InvalidHandle(format!(
                "Control {} in {:?} is a {:?}, expected {expected:?}",
                control_id.raw(),
                self.logical_window_id,
                control.kind
            ))),
            None => Err(PlatformError::InvalidHandle(format!(
                "Control {} not found in {:?}",
                control_id.raw(),
                self.logical_window_id
            ))),
        }
    }

    pub(crate) fn register_control_hwnd(
        &mut self,
        control_id: ControlId,
        hwnd: HWND,
        kind: ControlKind,
    ) {
        self.controls.insert(control_id, NativeControl { hwnd, kind });
    }

    pub(crate) fn set_layout_rules(&mut self, rules: Vec<LayoutRule>) {
        self.layout_rules = Some(rules);
    }

    pub(crate) fn set_label_severity(&mut self, control_id: ControlId, severity: MessageSeverity) {
        self.label_severities.insert(control_id, severity);
    }

    pub(crate) fn get_label_severity(&self, control_id: ControlId) -> Option<MessageSeverity> {
        self.label_severities.get(&control_id).copied()
    }
}

/// Context passed to `CreateWindowExW` via `lpCreateParams`.
/// This allows the static `WndProc` to retrieve the necessary `Arc`-ed state
/// for the specific window instance being created.
struct WindowCreationContext {
    internal_state_arc: Arc<Win32ApiInternalState>,
    window_id: WindowId,
}

fn window_class_name(internal_state: &Win32ApiInternalState) -> HSTRING {
    HSTRING::from(format!(
        "{}_PlatformWindowClass",
        internal_state.app_name_for_class
    ))
}

/// Registers the main window class for the application.
pub(crate) fn register_window_class(
    internal_state: &Arc<Win32ApiInternalState>,
) -> PlatformResult<()> {
    let class_name_hstring = window_class_name(internal_state);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());

    unsafe {
        let mut wc_test = WNDCLASSEXW::default();
        if GetClassInfoExW(
            Some(internal_state.h_instance()),
            class_name_pcwstr,
            &mut wc_test,
        )
        .is_ok()
        {
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(facade_wnd_proc_router),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: internal_state.h_instance(),
            hIcon: LoadIconW(None, IDI_APPLICATION)?,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: class_name_pcwstr,
            hIconSm: LoadIconW(None, IDI_APPLICATION)?,
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed: {error:?}");
            Err(PlatformError::InitializationFailed(format!(
                "RegisterClassExW failed: {error:?}"
            )))
        } else {
            Ok(())
        }
    }
}

/*
 * Creates the native top-level window. It is created hidden; the application
 * logic shows it once the controls are populated.
 */
pub(crate) fn create_native_window(
    internal_state_arc: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: &str,
    width: i32,
    height: i32,
) -> PlatformResult<HWND> {
    let class_name_hstring = window_class_name(internal_state_arc);

    let creation_context = Box::new(WindowCreationContext {
        internal_state_arc: Arc::clone(internal_state_arc),
        window_id,
    });
    let context_ptr = Box::into_raw(creation_context);

    let create_result = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            &class_name_hstring,
            &HSTRING::from(title),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            width,
            height,
            None,
            None,
            Some(internal_state_arc.h_instance()),
            Some(context_ptr as *mut c_void),
        )
    };

    match create_result {
        Ok(hwnd) => Ok(hwnd),
        Err(e) => {
            // The context is not reclaimed here: if WM_NCCREATE ran, WM_NCDESTROY already freed it.
            log::error!("Platform: CreateWindowExW failed for {window_id:?}: {e:?}");
            Err(PlatformError::WindowCreationFailed(format!(
                "CreateWindowExW failed: {e}"
            )))
        }
    }
}

/*
 * Creates the font shared by all controls of a window, scaled for the
 * screen DPI.
 */
pub(crate) fn create_control_font() -> PlatformResult<HFONT> {
    let hdc_screen = unsafe { GetDC(None) };
    if hdc_screen.is_invalid() {
        return Err(PlatformError::OperationFailed(
            "Could not get screen DC for font creation".to_string(),
        ));
    }
    let dpi = unsafe { GetDeviceCaps(Some(hdc_screen), LOGPIXELSY) };
    unsafe { ReleaseDC(None, hdc_screen) };

    let logical_font_height = -(CONTROL_FONT_POINT_SIZE * dpi / 72);
    let h_font = unsafe {
        CreateFontW(
            logical_font_height,
            0,
            0,
            0,
            FW_NORMAL.0 as i32,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            DEFAULT_QUALITY,
            FF_DONTCARE.0 as u32,
            &HSTRING::from("Segoe UI"),
        )
    };
    if h_font.is_invalid() {
        log::error!("Platform: CreateFontW failed: {:?}", unsafe {
            GetLastError()
        });
        return Err(PlatformError::OperationFailed("CreateFontW failed".to_string()));
    }
    Ok(h_font)
}

/*
 * Creates a child control of the given window and registers it under
 * `control_id`. The window map lock is not held while `CreateWindowExW` runs,
 * because control creation dispatches messages back to the window procedure.
 */
pub(crate) fn create_child_control(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    control_id: ControlId,
    kind: ControlKind,
    class_name: PCWSTR,
    text: &str,
    ex_style: WINDOW_EX_STYLE,
    style: WINDOW_STYLE,
) -> PlatformResult<HWND> {
    let (hwnd_parent, control_font) =
        internal_state.with_window_data_read(window_id, |window_data| {
            if window_data.has_control(control_id) {
                log::warn!(
                    "Platform: Control {} already exists for window {window_id:?}.",
                    control_id.raw()
                );
                return Err(PlatformError::ControlCreationFailed(format!(
                    "Control {} already exists for window {window_id:?}",
                    control_id.raw()
                )));
            }
            let hwnd = window_data.get_hwnd();
            if hwnd.is_invalid() {
                return Err(PlatformError::InvalidHandle(format!(
                    "Parent HWND invalid for control creation (WinID: {window_id:?})"
                )));
            }
            Ok((hwnd, window_data.get_control_font()))
        })?;

    let hwnd_control = unsafe {
        CreateWindowExW(
            ex_style,
            class_name,
            &HSTRING::from(text),
            WS_CHILD | WS_VISIBLE | style,
            0,
            0,
            10,
            10, // Layout rules set the real geometry on WM_SIZE.
            Some(hwnd_parent),
            Some(HMENU(control_id.raw() as isize as *mut c_void)),
            Some(internal_state.h_instance()),
            None,
        )
    }
    .map_err(|e| {
        PlatformError::ControlCreationFailed(format!(
            "CreateWindowExW for {kind:?} {} failed: {e}",
            control_id.raw()
        ))
    })?;

    if let Some(h_font) = control_font {
        unsafe {
            SendMessageW(
                hwnd_control,
                WM_SETFONT,
                Some(WPARAM(h_font.0 as usize)),
                Some(LPARAM(1)),
            )
        };
    }

    internal_state.with_window_data_write(window_id, |window_data| {
        window_data.register_control_hwnd(control_id, hwnd_control, kind);
        Ok(())
    })?;
    log::debug!(
        "Platform: Created {kind:?} (ID {}) for {window_id:?} with HWND {hwnd_control:?}",
        control_id.raw()
    );
    Ok(hwnd_control)
}

/// The main window procedure (WndProc) router for all windows created by this platform layer.
///
/// It retrieves the per-window `WindowCreationContext` and delegates to
/// `handle_window_message` on `Win32ApiInternalState`.
unsafe extern "system" fn facade_wnd_proc_router(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowCreationContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowCreationContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    let context = unsafe { &*context_ptr };
    let internal_state_arc = Arc::clone(&context.internal_state_arc);
    let window_id = context.window_id;

    if msg == WM_NCDESTROY {
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
        drop(unsafe { Box::from_raw(context_ptr) });
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    internal_state_arc.handle_window_message(hwnd, msg, wparam, lparam, window_id)
}

#[inline]
fn loword(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

#[inline]
fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

impl Win32ApiInternalState {
    fn handle_window_message(
        self: &Arc<Self>,
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
        window_id: WindowId,
    ) -> LRESULT {
        match msg {
            WM_COMMAND => {
                if lparam.0 == 0 {
                    // Menu or accelerator; this window has neither.
                    return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
                }
                let control_id = ControlId::new(loword(wparam.0) as i32);
                let notification_code = hiword(wparam.0) as u32;
                let hwnd_control = HWND(lparam.0 as *mut c_void);
                if let Some(event) =
                    self.translate_control_notification(window_id, control_id, notification_code, hwnd_control)
                {
                    self.send_event(event);
                }
                LRESULT(0)
            }
            WM_TIMER => {
                match TimerId::from_raw(wparam.0) {
                    Some(timer_id) => self.send_event(AppEvent::TimerElapsed {
                        window_id,
                        timer_id,
                    }),
                    None => log::warn!("Platform: WM_TIMER with unknown ID {}", wparam.0),
                }
                LRESULT(0)
            }
            WM_SIZE => {
                let width = (lparam.0 & 0xFFFF) as i32;
                let height = ((lparam.0 >> 16) & 0xFFFF) as i32;
                if let Err(e) = apply_layout(self, window_id, width, height) {
                    log::error!("Platform: Layout for {window_id:?} failed: {e}");
                }
                LRESULT(0)
            }
            WM_CTLCOLORSTATIC => {
                let hdc_static = HDC(wparam.0 as *mut c_void);
                let hwnd_static = HWND(lparam.0 as *mut c_void);
                label_handler::handle_wm_ctlcolorstatic(self, window_id, hdc_static, hwnd_static)
                    .unwrap_or_else(|| unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) })
            }
            WM_CLOSE => {
                log::debug!("Platform: WM_CLOSE for HWND {hwnd:?}, WindowId {window_id:?}");
                // The application logic decides; it answers with CloseWindow to proceed.
                self.send_event(AppEvent::WindowCloseRequestedByUser { window_id });
                LRESULT(0)
            }
            WM_DESTROY => {
                log::debug!("Platform: WM_DESTROY for HWND {hwnd:?}, WindowId {window_id:?}");
                let removed = self.remove_window_data(window_id);
                if let Some(h_font) = removed.and_then(|data| data.get_control_font()) {
                    unsafe {
                        let _ = DeleteObject(HGDIOBJ(h_font.0));
                    }
                }
                self.send_event(AppEvent::WindowDestroyed { window_id });
                LRESULT(0)
            }
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    /*
     * Maps a WM_COMMAND notification from a child control to an `AppEvent`,
     * based on the kind of control that sent it. Notification codes overlap
     * between control classes, so the kind decides how the code is read.
     */
    fn translate_control_notification(
        self: &Arc<Self>,
        window_id: WindowId,
        control_id: ControlId,
        notification_code: u32,
        hwnd_control: HWND,
    ) -> Option<AppEvent> {
        let kind = self
            .with_window_data_read(window_id, |window_data| {
                Ok(window_data.get_control_kind(control_id))
            })
            .ok()
            .flatten()?;

        match (kind, notification_code) {
            (ControlKind::Input, EN_CHANGE) => {
                input_handler::handle_en_change(window_id, control_id, hwnd_control)
            }
            (ControlKind::ListBox, LBN_SELCHANGE) => Some(listbox_handler::handle_lbn_selchange(
                window_id,
                control_id,
                hwnd_control,
            )),
            (ControlKind::Button, BN_CLICKED) => Some(button_handler::handle_bn_clicked(
                window_id,
                control_id,
                hwnd_control,
            )),
            _ => None,
        }
    }
}

/*
 * Placement of one control in client coordinates.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlRect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

/*
 * Computes control placements for a client area of the given size. Top and
 * Bottom rules are stacked from their edges in ascending `order`; Fill rules
 * all receive the remaining area. Margins are applied inside each slot and
 * sizes never go negative.
 */
pub(crate) fn calculate_dock_layout(
    client_width: i32,
    client_height: i32,
    rules: &[LayoutRule],
) -> Vec<(ControlId, ControlRect)> {
    let mut sorted: Vec<&LayoutRule> = rules.iter().collect();
    sorted.sort_by_key(|rule| rule.order);

    let mut top = 0;
    let mut bottom = client_height;
    let mut placements = Vec::with_capacity(rules.len());
    let mut fill_rules = Vec::new();

    let inset = |rule: &LayoutRule, x: i32, y: i32, width: i32, height: i32| {
        let (m_top, m_right, m_bottom, m_left) = rule.margin;
        ControlRect {
            x: x + m_left,
            y: y + m_top,
            width: (width - m_left - m_right).max(0),
            height: (height - m_top - m_bottom).max(0),
        }
    };

    for rule in sorted {
        match rule.dock_style {
            DockStyle::Top => {
                let height = rule.fixed_size.unwrap_or(0).min((bottom - top).max(0));
                placements.push((rule.control_id, inset(rule, 0, top, client_width, height)));
                top += height;
            }
            DockStyle::Bottom => {
                let height = rule.fixed_size.unwrap_or(0).min((bottom - top).max(0));
                bottom -= height;
                placements.push((rule.control_id, inset(rule, 0, bottom, client_width, height)));
            }
            DockStyle::Fill => fill_rules.push(rule),
        }
    }

    for rule in fill_rules {
        placements.push((
            rule.control_id,
            inset(rule, 0, top, client_width, (bottom - top).max(0)),
        ));
    }
    placements
}

fn apply_layout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    client_width: i32,
    client_height: i32,
) -> PlatformResult<()> {
    let placements: Vec<(HWND, ControlRect)> =
        internal_state.with_window_data_read(window_id, |window_data| {
            let Some(rules) = window_data.layout_rules.as_ref() else {
                return Ok(Vec::new());
            };
            Ok(calculate_dock_layout(client_width, client_height, rules)
                .into_iter()
                .filter_map(|(control_id, rect)| {
                    window_data
                        .get_control_hwnd(control_id)
                        .map(|hwnd| (hwnd, rect))
                })
                .collect())
        })?;

    for (hwnd_control, rect) in placements {
        unsafe {
            SetWindowPos(
                hwnd_control,
                None,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )?;
        }
    }
    Ok(())
}

/*
 * Re-runs the layout for the current client size. Used after new layout
 * rules are defined, since WM_SIZE may already have been delivered.
 */
pub(crate) fn relayout(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd = internal_state.with_window_data_read(window_id, |window_data| {
        Ok(window_data.get_hwnd())
    })?;
    let mut client_rect = windows::Win32::Foundation::RECT::default();
    unsafe { GetClientRect(hwnd, &mut client_rect)? };
    apply_layout(
        internal_state,
        window_id,
        client_rect.right - client_rect.left,
        client_rect.bottom - client_rect.top,
    )
}

// --- Helper functions for the command executor ---

pub(crate) fn set_window_title(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
    title: &str,
) -> PlatformResult<()> {
    let hwnd = internal_state.with_window_data_read(window_id, |window_data| {
        Ok(window_data.get_hwnd())
    })?;
    unsafe { SetWindowTextW(hwnd, &HSTRING::from(title))? };
    Ok(())
}

pub(crate) fn show_window(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd = internal_state.with_window_data_read(window_id, |window_data| {
        Ok(window_data.get_hwnd())
    })?;
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
    }
    Ok(())
}

/// Destroys a native window. This is called once the application logic confirms a close.
pub(crate) fn destroy_native_window(
    internal_state: &Arc<Win32ApiInternalState>,
    window_id: WindowId,
) -> PlatformResult<()> {
    let hwnd_to_destroy = internal_state
        .with_window_data_read(window_id, |window_data| Ok(window_data.get_hwnd()))
        .ok();

    match hwnd_to_destroy {
        Some(hwnd) if !hwnd.is_invalid() => {
            log::debug!("Platform: Calling DestroyWindow for HWND {hwnd:?}, WindowId {window_id:?}");
            unsafe { DestroyWindow(hwnd)? };
            Ok(())
        }
        _ => {
            log::debug!("Platform: WindowId {window_id:?} already destroyed.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: i32, dock_style: DockStyle, order: u32, fixed_size: Option<i32>) -> LayoutRule {
        LayoutRule {
            control_id: ControlId::new(id),
            dock_style,
            order,
            fixed_size,
            margin: (0, 0, 0, 0),
        }
    }

    #[test]
    fn test_dock_layout_stacks_edges_and_fills_remainder() {
        // Arrange
        let rules = vec![
            rule(1, DockStyle::Top, 0, Some(40)),
            rule(2, DockStyle::Bottom, 1, Some(20)),
            rule(3, DockStyle::Bottom, 2, Some(30)),
            rule(4, DockStyle::Fill, 10, None),
        ];

        // Act
        let placements = calculate_dock_layout(300, 200, &rules);

        // Assert
        let find = |id: i32| {
            placements
                .iter()
                .find(|(control_id, _)| *control_id == ControlId::new(id))
                .map(|(_, rect)| *rect)
                .unwrap()
        };
        assert_eq!(find(1), ControlRect { x: 0, y: 0, width: 300, height: 40 });
        assert_eq!(find(2), ControlRect { x: 0, y: 180, width: 300, height: 20 });
        assert_eq!(find(3), ControlRect { x: 0, y: 150, width: 300, height: 30 });
        assert_eq!(find(4), ControlRect { x: 0, y: 40, width: 300, height: 110 });
    }

    #[test]
    fn test_dock_layout_applies_margins_and_never_goes_negative() {
        let mut top = rule(1, DockStyle::Top, 0, Some(500));
        top.margin = (5, 10, 5, 10);
        let fill = rule(2, DockStyle::Fill, 1, None);

        let placements = calculate_dock_layout(100, 50, &[top, fill]);

        assert_eq!(
            placements[0].1,
            ControlRect { x: 10, y: 5, width: 80, height: 40 }
        );
        assert_eq!(placements[1].1.height, 0);
    }

    #[test]
    fn test_native_window_data_require_control_checks_kind() {
        let mut data = NativeWindowData::new(WindowId(1));
        let hwnd = HWND(0x1234 as *mut c_void);
        data.register_control_hwnd(ControlId::new(7), hwnd, ControlKind::ListBox);

        assert_eq!(
            data.require_control(ControlId::new(7), ControlKind::ListBox).ok(),
            Some(hwnd)
        );
        assert!(data.require_control(ControlId::new(7), ControlKind::Input).is_err());
        assert!(data.require_control(ControlId::new(8), ControlKind::ListBox).is_err());
    }
}
