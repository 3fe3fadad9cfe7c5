/*
 * The platform layer executes `PlatformCommand`s from the application logic
 * and turns native input into `AppEvent`s. On Windows it drives a Win32
 * window with standard controls; elsewhere a line-oriented console backend
 * exposes the same `PlatformInterface` so the application logic runs
 * unchanged.
 */
pub mod error;
pub mod types;

#[cfg(target_os = "windows")]
pub mod app;
#[cfg(target_os = "windows")]
pub(crate) mod command_executor;
#[cfg(target_os = "windows")]
pub(crate) mod controls;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

#[cfg(not(target_os = "windows"))]
pub mod console_app;

#[cfg(target_os = "windows")]
pub use app::PlatformInterface;
#[cfg(not(target_os = "windows"))]
pub use console_app::PlatformInterface;

pub use error::{PlatformError, Result as PlatformResult};
pub use types::{
    AppEvent, ControlId, MessageSeverity, PlatformCommand, PlatformEventHandler, TimerId,
    WindowConfig, WindowId,
};
