mod alerts;
mod controls;

pub use alerts::InstructionAlert;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{AppConfig, ConfigLoaded, ConfigResetNotification};

/// Resource that tracks whether any modal dialog is currently open.
/// Map gestures and shortcuts check this so taps on a dialog don't reach the map.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block map input
    pub any_modal_open: bool,
}

/// Run condition: returns true when no modal dialog is open.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

/// Aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    instructions: Res<InstructionAlert>,
    config_reset: Res<ConfigResetNotification>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = instructions.show || config_reset.show;
}

fn init_instruction_alert(config: Res<AppConfig>, mut alert: ResMut<InstructionAlert>) {
    alert.show = config.data.show_instructions;
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<InstructionAlert>()
            .add_systems(Startup, init_instruction_alert.after(ConfigLoaded))
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Controls first so dialogs draw over them
                    controls::clear_button_ui,
                    controls::compass_ui,
                    controls::route_summary_ui,
                    alerts::instruction_alert_ui,
                    alerts::config_reset_notification_ui,
                )
                    .chain(),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(show_instructions: bool) -> App {
        let mut config = AppConfig::default();
        config.data.show_instructions = show_instructions;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(config)
            .init_resource::<DialogState>()
            .init_resource::<InstructionAlert>()
            .init_resource::<ConfigResetNotification>()
            .add_systems(Startup, init_instruction_alert)
            .add_systems(First, update_dialog_state);
        app
    }

    #[test]
    fn test_instructions_block_map_input_until_dismissed() {
        let mut app = test_app(true);
        app.update();
        assert!(app.world().resource::<DialogState>().any_modal_open);

        app.world_mut().resource_mut::<InstructionAlert>().show = false;
        app.update();
        assert!(!app.world().resource::<DialogState>().any_modal_open);
    }

    #[test]
    fn test_instructions_can_be_disabled() {
        let mut app = test_app(false);
        app.update();
        assert!(!app.world().resource::<InstructionAlert>().show);
        assert!(!app.world().resource::<DialogState>().any_modal_open);
    }

    #[test]
    fn test_config_reset_counts_as_modal() {
        let mut app = test_app(false);
        app.world_mut()
            .resource_mut::<ConfigResetNotification>()
            .show = true;
        app.update();
        assert!(app.world().resource::<DialogState>().any_modal_open);
    }
}
