//! Startup alerts: the one-time instructions and the config reset notice.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::ConfigResetNotification;
use crate::constants::INSTRUCTIONS_MESSAGE;
use crate::theme;

/// Instructional alert shown once at launch
#[derive(Resource, Default)]
pub struct InstructionAlert {
    pub show: bool,
}

pub fn instruction_alert_ui(
    mut contexts: EguiContexts,
    mut alert: ResMut<InstructionAlert>,
) -> Result {
    if !alert.show {
        return Ok(());
    }

    egui::Window::new("Instructions")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(INSTRUCTIONS_MESSAGE);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    alert.show = false;
                }
            });
        });

    Ok(())
}

pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The configuration file could not be loaded, so defaults are in use.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(4.0);
                ui.colored_label(theme::ui::LABEL_TEXT, reason);
            }
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });

    Ok(())
}
