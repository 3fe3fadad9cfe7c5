use super::command_executor;
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{AppEvent, PlatformCommand, PlatformEventHandler, WindowConfig, WindowId};
use super::window_common::{self, NativeWindowData};

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::{ICC_STANDARD_CLASSES, INITCOMMONCONTROLSEX, InitCommonControlsEx},
            WindowsAndMessaging::{DispatchMessageW, GetMessageW, MSG, TranslateMessage},
        },
    },
    core::PCWSTR,
};

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, RwLock, Weak,
    atomic::{AtomicUsize, Ordering},
};

/// Internal state for the Win32 platform layer.
///
/// This struct holds all Win32 handles and mappings required to manage the
/// application's lifecycle and UI elements. It is managed by
/// `PlatformInterface` and accessed by the `WndProc` and command handlers.
pub(crate) struct Win32ApiInternalState {
    h_instance: HINSTANCE,
    next_window_id_counter: AtomicUsize,
    /// Maps platform-agnostic `WindowId` to the native window data.
    active_windows: RwLock<HashMap<WindowId, NativeWindowData>>,
    /// Weak so that the handler and the platform do not keep each other alive.
    application_event_handler: Mutex<Option<Weak<Mutex<dyn PlatformEventHandler>>>>,
    /// The application name, used for window class registration.
    pub(crate) app_name_for_class: String,
}

impl Win32ApiInternalState {
    pub(crate) fn new(app_name_for_class: String) -> PlatformResult<Arc<Self>> {
        let icex = INITCOMMONCONTROLSEX {
            dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_STANDARD_CLASSES,
        };
        if !unsafe { InitCommonControlsEx(&icex) }.as_bool() {
            log::warn!(
                "Platform: InitCommonControlsEx failed: {:?}",
                unsafe { GetLastError() }
            );
        }

        let h_instance = HINSTANCE(unsafe { GetModuleHandleW(PCWSTR::null()) }?.0);
        Ok(Arc::new(Self {
            h_instance,
            next_window_id_counter: AtomicUsize::new(1),
            active_windows: RwLock::new(HashMap::new()),
            application_event_handler: Mutex::new(None),
            app_name_for_class,
        }))
    }

    pub(crate) fn h_instance(&self) -> HINSTANCE {
        self.h_instance
    }

    pub(crate) fn generate_window_id(&self) -> WindowId {
        WindowId(self.next_window_id_counter.fetch_add(1, Ordering::Relaxed))
    }

    /*
     * Runs `f` with shared access to the data of `window_id`. Fails if the
     * lock is poisoned or the window is unknown.
     */
    pub(crate) fn with_window_data_read<R>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&NativeWindowData) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let windows_guard = self.active_windows.read().map_err(|_| {
            log::error!("Platform: Failed to acquire read lock on windows map.");
            PlatformError::OperationFailed("Failed to acquire read lock on windows map".into())
        })?;
        let window_data = windows_guard.get(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    pub(crate) fn with_window_data_write<R>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&mut NativeWindowData) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let mut windows_guard = self.active_windows.write().map_err(|_| {
            log::error!("Platform: Failed to acquire write lock on windows map.");
            PlatformError::OperationFailed("Failed to acquire write lock on windows map".into())
        })?;
        let window_data = windows_guard.get_mut(&window_id).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("WindowId {window_id:?} not found"))
        })?;
        f(window_data)
    }

    fn insert_window_data(&self, window_id: WindowId, data: NativeWindowData) -> PlatformResult<()> {
        self.active_windows
            .write()
            .map_err(|_| {
                PlatformError::OperationFailed("Failed to lock windows map for insert".into())
            })?
            .insert(window_id, data);
        Ok(())
    }

    pub(crate) fn remove_window_data(&self, window_id: WindowId) -> Option<NativeWindowData> {
        match self.active_windows.write() {
            Ok(mut windows_guard) => windows_guard.remove(&window_id),
            Err(_) => {
                log::error!("Platform: Failed to lock windows map to remove {window_id:?}.");
                None
            }
        }
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
     * Delivers `event` to the application logic and then executes the commands
     * it enqueued. The handler lock is released before any command runs:
     * executing a command can dispatch window messages synchronously (e.g.
     * `SetWindowTextW` raises EN_CHANGE), which re-enter `send_event`.
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
        self.process_pending_commands(&handler_arc);
    }

    fn process_pending_commands(
        self: &Arc<Self>,
        handler_arc: &Arc<Mutex<dyn PlatformEventHandler>>,
    ) {
        loop {
            let next_command = match handler_arc.lock() {
                Ok(mut handler_guard) => handler_guard.try_dequeue_command(),
                Err(_) => {
                    log::error!("Platform: Event handler mutex poisoned while dequeuing.");
                    None
                }
            };
            let Some(command) = next_command else {
                break;
            };
            if let Err(e) = command_executor::execute_command(self, command) {
                log::error!("Platform: Command failed: {e}");
            }
        }
    }
}

/// The primary interface to the platform abstraction layer.
pub struct PlatformInterface {
    internal_state: Arc<Win32ApiInternalState>,
}

impl PlatformInterface {
    pub fn new(app_name_for_class: String) -> PlatformResult<Self> {
        let internal_state = Win32ApiInternalState::new(app_name_for_class)?;
        window_common::register_window_class(&internal_state)?;
        log::debug!("Platform: Window class registered.");
        Ok(PlatformInterface { internal_state })
    }

    pub fn create_window(&self, config: WindowConfig) -> PlatformResult<WindowId> {
        let window_id = self.internal_state.generate_window_id();

        // Inserted before creation so messages sent during CreateWindowExW find the entry.
        self.internal_state
            .insert_window_data(window_id, NativeWindowData::new(window_id))?;

        let hwnd = match window_common::create_native_window(
            &self.internal_state,
            window_id,
            config.title,
            config.width,
            config.height,
        ) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                self.internal_state.remove_window_data(window_id);
                return Err(e);
            }
        };

        let control_font = window_common::create_control_font()
            .inspect_err(|e| log::warn!("Platform: Using the system font: {e}"))
            .ok();
        self.internal_state
            .with_window_data_write(window_id, |window_data| {
                window_data.set_hwnd(hwnd);
                if let Some(h_font) = control_font {
                    window_data.set_control_font(h_font);
                }
                Ok(())
            })?;
        log::debug!("Platform: Created window {window_id:?} with HWND {hwnd:?}");
        Ok(window_id)
    }

    pub fn execute_command(&self, command: PlatformCommand) -> PlatformResult<()> {
        command_executor::execute_command(&self.internal_state, command)
    }

    /*
     * Registers the event handler, executes the initial UI description
     * commands, and runs the Win32 message loop until `WM_QUIT`.
     */
    pub fn run(
        &self,
        event_handler: Arc<Mutex<dyn PlatformEventHandler>>,
        initial_commands: Vec<PlatformCommand>,
    ) -> PlatformResult<()> {
        self.internal_state.set_event_handler(Some(&event_handler))?;

        for command in initial_commands {
            self.execute_command(command)?;
        }

        let mut msg = MSG::default();
        loop {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            if result.0 > 0 {
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            } else if result.0 == 0 {
                log::debug!("Platform: WM_QUIT received, exiting message loop.");
                break;
            } else {
                let last_error = unsafe { GetLastError() };
                log::error!("Platform: GetMessageW failed: {last_error:?}");
                return Err(PlatformError::OperationFailed(format!(
                    "GetMessageW failed: {last_error:?}"
                )));
            }
        }

        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        self.internal_state.set_event_handler(None)?;
        log::debug!("Platform: Message loop exited cleanly.");
        Ok(())
    }
}
