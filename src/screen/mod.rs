//! Screen controller: wires gestures, permission results and routing into map changes.
//!
//! Every transition in the pin/route lifecycle starts and ends in `InteractionPhase::Idle`;
//! failures fall back to idle without blocking further interaction.

mod recenter;
mod systems;

#[cfg(test)]
mod tests;

pub use recenter::RecenterSchedule;

use bevy::prelude::*;

use crate::routing::RoutingSystems;
use crate::ui::no_dialog_open;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    #[default]
    Idle,
    /// Transient: a pin is being added this frame
    PinPlaced,
    RouteRequested,
}

/// Remove every pin and every overlay
#[derive(Message, Debug, Clone, Copy)]
pub struct ClearAllRequest;

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionPhase>()
            .init_resource::<RecenterSchedule>()
            .add_message::<ClearAllRequest>()
            .add_systems(
                Update,
                (
                    systems::finish_route_request,
                    systems::clear_shortcut.run_if(no_dialog_open),
                    systems::place_pin_on_long_press,
                    systems::route_to_selected_pin,
                    systems::clear_all,
                    systems::schedule_recenter,
                    systems::run_recenter,
                )
                    .chain()
                    .after(RoutingSystems::Poll)
                    .before(RoutingSystems::Request),
            );
    }
}
