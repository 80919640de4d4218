//! Bevy systems that issue directions requests off the UI thread and apply the results.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::location::CurrentLocation;
use crate::map::{MapView, RouteOverlay, SetRegion, UserTrackingMode};

use super::osrm::OsrmDirections;
use super::service::{DirectionsError, DirectionsRequest, DirectionsService, Route};
use super::{RouteOutcome, RouteRequested, RouteSettled};

/// The directions service shared with background tasks
#[derive(Resource, Clone)]
pub struct DirectionsClient(pub Arc<dyn DirectionsService>);

/// Monotonic request token; only the latest token may install an overlay
#[derive(Resource, Debug, Default)]
pub struct RouteSequence {
    latest: u64,
}

impl RouteSequence {
    pub fn next_token(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Make every in-flight request stale
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }
}

/// Background directions request
#[derive(Component)]
pub struct RouteTask {
    token: u64,
    task: Task<Result<Vec<Route>, DirectionsError>>,
}

/// Startup system: build the OSRM client from config unless one was inserted already
pub fn init_directions_client(
    mut commands: Commands,
    config: Res<AppConfig>,
    existing: Option<Res<DirectionsClient>>,
) {
    if existing.is_some() {
        return;
    }

    let timeout = Duration::from_secs(config.data.request_timeout_secs.max(1));
    info!("Using directions service at {}", config.data.directions_url);
    commands.insert_resource(DirectionsClient(Arc::new(OsrmDirections::new(
        &config.data.directions_url,
        timeout,
    ))));
}

/// Spawn a background task for each route request
pub fn request_route(
    mut commands: Commands,
    mut requests: MessageReader<RouteRequested>,
    current: Res<CurrentLocation>,
    client: Option<Res<DirectionsClient>>,
    mut sequence: ResMut<RouteSequence>,
    mut settled: MessageWriter<RouteSettled>,
) {
    for request in requests.read() {
        let Some(fix) = current.fix else {
            debug!("No current location; ignoring route request");
            settled.write(RouteSettled {
                outcome: RouteOutcome::NoLocation,
            });
            continue;
        };

        let Some(ref client) = client else {
            warn!("No directions service configured");
            settled.write(RouteSettled {
                outcome: RouteOutcome::Failed,
            });
            continue;
        };

        let token = sequence.next_token();
        let directions = DirectionsRequest::driving(fix.coordinate, request.destination);
        let service = Arc::clone(&client.0);
        debug!(
            "Requesting route #{token} from {} to {}",
            directions.source, directions.destination
        );

        let task_pool = AsyncComputeTaskPool::get();
        let task = task_pool.spawn(async move { service.calculate(&directions) });

        commands.spawn(RouteTask { token, task });
    }
}

/// Poll route tasks and apply results on the main world
pub fn poll_route_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut RouteTask)>,
    sequence: Res<RouteSequence>,
    mut map_view: ResMut<MapView>,
    mut set_region: MessageWriter<SetRegion>,
    mut settled: MessageWriter<RouteSettled>,
) {
    for (entity, mut route_task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut route_task.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let outcome = if !sequence.is_current(route_task.token) {
            debug!("Discarding stale route #{}", route_task.token);
            RouteOutcome::Superseded
        } else {
            match result {
                Ok(routes) => match routes.into_iter().next() {
                    Some(route) => {
                        apply_route(&mut commands, route, &mut map_view, &mut set_region)
                    }
                    None => {
                        info!("Directions service found no route");
                        RouteOutcome::NoRoutes
                    }
                },
                Err(e) => {
                    warn!("Route request failed: {}", e);
                    RouteOutcome::Failed
                }
            }
        };

        settled.write(RouteSettled { outcome });
    }
}

fn apply_route(
    commands: &mut Commands,
    route: Route,
    map_view: &mut MapView,
    set_region: &mut MessageWriter<SetRegion>,
) -> RouteOutcome {
    let Some(region) = route.bounding_region() else {
        info!("Directions service returned a route without geometry");
        return RouteOutcome::NoRoutes;
    };

    info!(
        "Route found: {:.1} km, {:.0} min",
        route.distance_meters / 1000.0,
        route.expected_travel_time_secs / 60.0
    );

    commands.spawn(RouteOverlay {
        polyline: route.polyline,
        region,
        distance_meters: route.distance_meters,
        expected_travel_time_secs: route.expected_travel_time_secs,
    });

    // Route framing suspends user tracking
    map_view.tracking_mode = UserTrackingMode::None;
    set_region.write(SetRegion {
        region,
        animated: true,
    });

    RouteOutcome::Applied
}
