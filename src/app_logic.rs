/*
 * This module provides the application logic layer, centered around
 * `MyAppLogic`, which acts as the Presenter for the main window. The search
 * session state it drives lives in `MainWindowUiState`.
 * Unit tests for `MyAppLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod main_window_ui_state;
pub mod ui_constants;
