//! Location permission coordination and live position tracking.
//!
//! The coordinator reads the authorization status at startup and re-runs the same
//! decision for every authorization change the location service reports. Position fixes
//! are drained from the service once per frame and re-raised as messages.

mod permission;
mod provider;
mod systems;


pub use permission::AuthorizationStatus;
pub use provider::{Fix, LocationProvider, SimulatedLocationProvider};

use bevy::prelude::*;

use crate::config::ConfigLoaded;

/// Owns the active location service
#[derive(Resource)]
pub struct LocationManager {
    provider: Box<dyn LocationProvider>,
}

impl LocationManager {
    pub fn new(provider: impl LocationProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    pub fn provider(&self) -> &dyn LocationProvider {
        self.provider.as_ref()
    }

    pub fn provider_mut(&mut self) -> &mut dyn LocationProvider {
        self.provider.as_mut()
    }
}

/// Most recent position fix, if any has arrived
#[derive(Resource, Default)]
pub struct CurrentLocation {
    pub fix: Option<Fix>,
}

/// Authorization status changed (including as a result of our own request)
#[derive(Message, Debug, Clone, Copy)]
pub struct AuthorizationChanged(pub AuthorizationStatus);

/// The location service delivered a new fix
#[derive(Message, Debug, Clone, Copy)]
pub struct UserLocationUpdated(pub Fix);

/// Ask the screen to schedule a delayed recentre on the user
#[derive(Message, Debug, Clone, Copy)]
pub struct RecenterRequest;

pub struct LocationPlugin;

impl Plugin for LocationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLocation>()
            .add_message::<AuthorizationChanged>()
            .add_message::<UserLocationUpdated>()
            .add_message::<RecenterRequest>()
            .add_systems(
                Startup,
                (
                    systems::init_location_manager,
                    systems::check_location_authorization,
                )
                    .chain()
                    .after(ConfigLoaded),
            )
            .add_systems(
                PreUpdate,
                (
                    systems::poll_location_service,
                    systems::handle_authorization_changes
                        .run_if(on_message::<AuthorizationChanged>),
                )
                    .chain(),
            );
    }
}
