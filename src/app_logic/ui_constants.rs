/*
 * Defines shared constants for logical UI control identifiers.
 * These IDs are used by the `ui_description_layer` to define the initial UI
 * structure and by the `app_logic` (Presenter) to target specific controls
 * for dynamic updates. The `platform_layer` maps these logical IDs to native
 * UI element handles.
 */

use crate::platform_layer::types::ControlId;

// The text input receiving the (partial) filename, typed or scanned.
pub const SEARCH_INPUT_ID: ControlId = ControlId::new(1001);

// The list of matching filenames. Selecting an entry starts the copy workflow.
pub const RESULTS_LIST_ID: ControlId = ControlId::new(1002);

pub const CLEAR_BUTTON_ID: ControlId = ControlId::new(1003);

// Logical ID for the label displaying general status messages.
pub const STATUS_LABEL_ID: ControlId = ControlId::new(1010);

// Logical ID for the label summarizing the loaded configuration.
pub const CONFIG_INFO_LABEL_ID: ControlId = ControlId::new(1011);

pub const MAIN_WINDOW_TITLE: &str = "File Search & Copy Tool";

pub const SEARCH_INPUT_CUE_BANNER: &str = "Enter or scan a file name...";
