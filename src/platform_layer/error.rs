#[cfg(target_os = "windows")]
use windows::core::Error as WinError;

/*
 * Failures of the platform layer while it builds the touch window or executes
 * a `PlatformCommand`. Command failures are logged by the dispatcher and do
 * not stop the event loop; only failures during startup (class registration,
 * window creation, the initial layout commands) end `run` with an error.
 */
#[derive(Debug, Clone)]
pub enum PlatformError {
    /// A Win32 call failed, e.g. `GetModuleHandleW` or `SetTimer`.
    #[cfg(target_os = "windows")]
    Win32(WinError),
    /// Window class registration or the console's stdin reader could not be set up.
    InitializationFailed(String),
    /// `CreateWindowExW` returned no handle for the main window.
    WindowCreationFailed(String),
    /// A control could not be created, or its ID is already in use in the window.
    ControlCreationFailed(String),
    /// A `WindowId` or `ControlId` that is unknown, or names a control of the wrong kind.
    InvalidHandle(String),
    /// A command reached a live window but could not be carried out,
    /// such as a dialog that failed to open or a poisoned lock.
    OperationFailed(String),
}

#[cfg(target_os = "windows")]
impl From<WinError> for PlatformError {
    fn from(err: WinError) -> Self {
        PlatformError::Win32(err)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => write!(f, "Win32 Error: {e}"),
            PlatformError::InitializationFailed(s) => write!(f, "Initialization Failed: {s}"),
            PlatformError::WindowCreationFailed(s) => write!(f, "Window Creation Failed: {s}"),
            PlatformError::ControlCreationFailed(s) => write!(f, "Control Creation Failed: {s}"),
            PlatformError::InvalidHandle(s) => write!(f, "Invalid Handle: {s}"),
            PlatformError::OperationFailed(s) => write!(f, "Operation Failed: {s}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of a platform layer operation.
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_prefixes_the_failure_kind() {
        let err = PlatformError::InvalidHandle("Control ID 1002 not found".to_string());
        assert_eq!(err.to_string(), "Invalid Handle: Control ID 1002 not found");

        let err = PlatformError::OperationFailed("MessageBoxW failed".to_string());
        assert_eq!(err.to_string(), "Operation Failed: MessageBoxW failed");
    }

    #[test]
    fn test_plain_variants_have_no_source() {
        let err = PlatformError::ControlCreationFailed("duplicate ID".to_string());
        assert!(err.source().is_none());
    }
}
