//! Route requester: driving directions from the user's location to a selected pin.

mod osrm;
mod service;
mod systems;


pub use service::{DirectionsError, DirectionsRequest, DirectionsService, Route};
pub use systems::{DirectionsClient, RouteSequence};

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::geo::Coordinate;

/// Ordering for the route lifecycle.
///
/// Results are polled (and their overlays spawned) in `Poll`; new requests are sent in
/// `Request`. Systems that add or remove overlays run between the two so they see every
/// overlay spawned this frame and their requests leave in the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingSystems {
    Poll,
    Request,
}

/// Route from the current location to `destination`
#[derive(Message, Debug, Clone, Copy)]
pub struct RouteRequested {
    pub destination: Coordinate,
}

/// How a route request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Overlay installed and camera moved
    Applied,
    /// Service answered with zero candidate routes
    NoRoutes,
    /// Service or transport error
    Failed,
    /// No current location, nothing was sent
    NoLocation,
    /// A newer request or a clear made this result obsolete
    Superseded,
}

/// A route request finished, successfully or not
#[derive(Message, Debug, Clone, Copy)]
pub struct RouteSettled {
    pub outcome: RouteOutcome,
}

pub struct RoutingPlugin;

impl Plugin for RoutingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RouteSequence>()
            .add_message::<RouteRequested>()
            .add_message::<RouteSettled>()
            .add_systems(
                Startup,
                systems::init_directions_client.after(ConfigLoaded),
            )
            .configure_sets(
                Update,
                (RoutingSystems::Poll, RoutingSystems::Request).chain(),
            )
            .add_systems(
                Update,
                (
                    systems::poll_route_tasks.in_set(RoutingSystems::Poll),
                    systems::request_route.in_set(RoutingSystems::Request),
                ),
            );
    }
}
