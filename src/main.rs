mod app_logic;
mod core;
mod platform_layer;
mod ui_description_layer;

use crate::app_logic::handler::{APP_NAME, MyAppLogic};
use crate::app_logic::ui_constants::MAIN_WINDOW_TITLE;
use crate::core::{
    ConfigManagerOperations, CoreConfigManager, CoreFileCopier, CoreFileSearcher,
    FileCopierOperations, FileSearcherOperations, path_utils,
};
use crate::platform_layer::{PlatformInterface, PlatformResult, WindowConfig};

use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::sync::{Arc, Mutex, Once};

static LOGGING_INIT: Once = Once::new();

/*
 * Initializes the global logger once per process: a terminal logger plus a
 * debug-level log file in the temp directory. Tests call this too, so later
 * calls are no-ops.
 */
pub(crate) fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        let terminal_level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            terminal_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];

        let log_path = path_utils::log_file_path(APP_NAME);
        match File::create(&log_path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Could not create log file {log_path:?}: {e}"),
        }

        if let Err(e) = CombinedLogger::init(loggers) {
            eprintln!("Failed to initialize logger: {e}");
        } else {
            log::debug!("Logging initialized, log file {log_path:?}.");
        }
    });
}

fn main() -> PlatformResult<()> {
    initialize_logging();
    log::info!("Application starting...");

    let platform_interface = PlatformInterface::new(APP_NAME.to_string())?;
    log::debug!("Platform interface created.");

    let config_manager: Arc<dyn ConfigManagerOperations> = Arc::new(CoreConfigManager::new());
    let file_searcher: Arc<dyn FileSearcherOperations> = Arc::new(CoreFileSearcher::new());
    let file_copier: Arc<dyn FileCopierOperations> = Arc::new(CoreFileCopier::new());
    let my_app_logic = Arc::new(Mutex::new(MyAppLogic::new(
        config_manager,
        file_searcher,
        file_copier,
    )));

    let main_window_id = platform_interface.create_window(WindowConfig {
        title: MAIN_WINDOW_TITLE,
        width: 800,
        height: 600,
    })?;
    log::debug!("Main window created with ID {main_window_id:?}.");

    let initial_commands = ui_description_layer::build_main_window_static_layout(main_window_id);
    let run_result = platform_interface.run(my_app_logic, initial_commands);

    match &run_result {
        Ok(()) => log::info!("Application exited cleanly."),
        Err(e) => log::error!("Application exited with error: {e}"),
    }
    run_result
}
