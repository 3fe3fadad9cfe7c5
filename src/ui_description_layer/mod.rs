/*
 * This module is responsible for defining the static structure of the UI.
 * It generates a series of `PlatformCommand`s that describe the controls of
 * the main window (search input, result list, clear button, status and
 * configuration labels) and the dock layout that sizes them. This decouples
 * the UI definition from the platform-specific implementation.
 */
use crate::app_logic::ui_constants;

use crate::platform_layer::types::{
    DockStyle, LabelClass, LayoutRule, PlatformCommand, WindowId,
};

// Heights are generous so that every control is usable on a touch screen.
const INPUT_HEIGHT: i32 = 56;
const CLEAR_BUTTON_HEIGHT: i32 = 64;
const CONFIG_INFO_HEIGHT: i32 = 28;
const STATUS_LABEL_HEIGHT: i32 = 32;
const EDGE_MARGIN: i32 = 8;

/*
 * Generates the `PlatformCommand`s that build the main window's controls,
 * followed by the `DefineLayout` command positioning them and the signal that
 * the static setup is complete.
 *
 * This function is intended to be called only once per window, during the
 * initial construction of the main window.
 */
pub fn build_main_window_static_layout(window_id: WindowId) -> Vec<PlatformCommand> {
    log::debug!("ui_description_layer: build_main_window_static_layout called.");

    let mut commands = vec![
        PlatformCommand::CreateInput {
            window_id,
            control_id: ui_constants::SEARCH_INPUT_ID,
            cue_banner: ui_constants::SEARCH_INPUT_CUE_BANNER.to_string(),
        },
        PlatformCommand::CreateListBox {
            window_id,
            control_id: ui_constants::RESULTS_LIST_ID,
        },
        PlatformCommand::CreateButton {
            window_id,
            control_id: ui_constants::CLEAR_BUTTON_ID,
            text: "Clear".to_string(),
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::CONFIG_INFO_LABEL_ID,
            initial_text: String::new(),
            class: LabelClass::Default,
        },
        PlatformCommand::CreateLabel {
            window_id,
            control_id: ui_constants::STATUS_LABEL_ID,
            initial_text: "Status: Initial".to_string(),
            class: LabelClass::StatusBar,
        },
    ];

    // Bottom docks stack upwards in order: status, configuration, clear button.
    let layout_rules = vec![
        LayoutRule {
            control_id: ui_constants::SEARCH_INPUT_ID,
            dock_style: DockStyle::Top,
            order: 0,
            fixed_size: Some(INPUT_HEIGHT),
            margin: (EDGE_MARGIN, EDGE_MARGIN, 4, EDGE_MARGIN),
        },
        LayoutRule {
            control_id: ui_constants::STATUS_LABEL_ID,
            dock_style: DockStyle::Bottom,
            order: 1,
            fixed_size: Some(STATUS_LABEL_HEIGHT),
            margin: (4, EDGE_MARGIN, 4, EDGE_MARGIN),
        },
        LayoutRule {
            control_id: ui_constants::CONFIG_INFO_LABEL_ID,
            dock_style: DockStyle::Bottom,
            order: 2,
            fixed_size: Some(CONFIG_INFO_HEIGHT),
            margin: (2, EDGE_MARGIN, 2, EDGE_MARGIN),
        },
        LayoutRule {
            control_id: ui_constants::CLEAR_BUTTON_ID,
            dock_style: DockStyle::Bottom,
            order: 3,
            fixed_size: Some(CLEAR_BUTTON_HEIGHT),
            margin: (4, EDGE_MARGIN, 4, EDGE_MARGIN),
        },
        LayoutRule {
            control_id: ui_constants::RESULTS_LIST_ID,
            dock_style: DockStyle::Fill,
            order: 10,
            fixed_size: None,
            margin: (4, EDGE_MARGIN, 4, EDGE_MARGIN),
        },
    ];

    commands.push(PlatformCommand::DefineLayout {
        window_id,
        rules: layout_rules,
    });
    commands.push(PlatformCommand::SignalMainWindowUISetupComplete { window_id });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_layer::types::ControlId;
    use std::collections::HashSet;

    fn created_control_ids(commands: &[PlatformCommand]) -> Vec<ControlId> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                PlatformCommand::CreateInput { control_id, .. }
                | PlatformCommand::CreateListBox { control_id, .. }
                | PlatformCommand::CreateButton { control_id, .. }
                | PlatformCommand::CreateLabel { control_id, .. } => Some(*control_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_every_created_control_has_exactly_one_layout_rule() {
        // Arrange
        let window_id = WindowId(1);

        // Act
        let commands = build_main_window_static_layout(window_id);

        // Assert
        let created: HashSet<ControlId> = created_control_ids(&commands).into_iter().collect();
        assert_eq!(created.len(), 5);
        let rules = commands
            .iter()
            .find_map(|cmd| match cmd {
                PlatformCommand::DefineLayout { rules, .. } => Some(rules.clone()),
                _ => None,
            })
            .expect("DefineLayout command missing");
        let laid_out: Vec<ControlId> = rules.iter().map(|rule| rule.control_id).collect();
        assert_eq!(laid_out.len(), created.len());
        assert_eq!(laid_out.iter().copied().collect::<HashSet<_>>(), created);
        assert_eq!(
            rules
                .iter()
                .filter(|rule| rule.dock_style == DockStyle::Fill)
                .count(),
            1
        );
    }

    #[test]
    fn test_setup_complete_signal_is_last() {
        let window_id = WindowId(7);
        let commands = build_main_window_static_layout(window_id);
        assert_eq!(
            commands.last(),
            Some(&PlatformCommand::SignalMainWindowUISetupComplete { window_id })
        );
        assert!(commands.iter().any(|cmd| matches!(
            cmd,
            PlatformCommand::CreateLabel { control_id, class: LabelClass::StatusBar, .. }
                if *control_id == ui_constants::STATUS_LABEL_ID
        )));
    }
}
