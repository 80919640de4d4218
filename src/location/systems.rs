//! Bevy systems driving the location service.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::DESIRED_ACCURACY_METERS;
use crate::map::MapView;

use super::permission::{AuthorizationStatus, PermissionAction, decide};
use super::provider::{LocationEvent, LocationProvider, SimulatedLocationProvider};
use super::{
    AuthorizationChanged, CurrentLocation, LocationManager, RecenterRequest, UserLocationUpdated,
};

/// Startup system: build the location service from config unless one was inserted already
pub fn init_location_manager(
    mut commands: Commands,
    config: Res<AppConfig>,
    existing: Option<Res<LocationManager>>,
) {
    if existing.is_some() {
        return;
    }

    let source = &config.data.location;
    info!(
        "Using simulated location at ({}, {}), initial status {:?}",
        source.latitude, source.longitude, source.initial_status
    );
    commands.insert_resource(LocationManager::new(
        SimulatedLocationProvider::from_config(source),
    ));
}

/// Startup system: run the permission decision on the current status
pub fn check_location_authorization(
    mut manager: ResMut<LocationManager>,
    mut current: ResMut<CurrentLocation>,
    mut map_view: ResMut<MapView>,
    mut recenter: MessageWriter<RecenterRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    let status = manager.provider().authorization_status();
    debug!("Initial location authorization: {:?}", status);
    apply_authorization(
        status,
        manager.provider_mut(),
        &mut current,
        &mut map_view,
        &mut recenter,
        &mut exit,
    );
}

/// Re-enter the permission decision for every reported status change
pub fn handle_authorization_changes(
    mut events: MessageReader<AuthorizationChanged>,
    mut manager: ResMut<LocationManager>,
    mut current: ResMut<CurrentLocation>,
    mut map_view: ResMut<MapView>,
    mut recenter: MessageWriter<RecenterRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for AuthorizationChanged(status) in events.read() {
        info!("Location authorization changed to {:?}", status);
        apply_authorization(
            *status,
            manager.provider_mut(),
            &mut current,
            &mut map_view,
            &mut recenter,
            &mut exit,
        );
    }
}

/// Drain the location service and re-raise its notifications in order
pub fn poll_location_service(
    time: Res<Time>,
    manager: Option<ResMut<LocationManager>>,
    mut current: ResMut<CurrentLocation>,
    mut authorization: MessageWriter<AuthorizationChanged>,
    mut updates: MessageWriter<UserLocationUpdated>,
) {
    let Some(mut manager) = manager else {
        return;
    };

    for event in manager.provider_mut().poll_events(time.delta()) {
        match event {
            LocationEvent::AuthorizationChanged(status) => {
                authorization.write(AuthorizationChanged(status));
            }
            LocationEvent::LocationUpdated(fix) => {
                current.fix = Some(fix);
                updates.write(UserLocationUpdated(fix));
            }
        }
    }
}

/// The single decision procedure shared by the startup check and change notifications
pub(super) fn apply_authorization(
    status: AuthorizationStatus,
    provider: &mut dyn LocationProvider,
    current: &mut CurrentLocation,
    map_view: &mut MapView,
    recenter: &mut MessageWriter<RecenterRequest>,
    exit: &mut MessageWriter<AppExit>,
) {
    match decide(status) {
        PermissionAction::RequestWhenInUse => {
            info!("Requesting when-in-use location authorization");
            provider.request_when_in_use_authorization();
        }
        PermissionAction::StartTracking => {
            provider.set_desired_accuracy(DESIRED_ACCURACY_METERS);
            provider.start_updating_location();
            map_view.shows_user_location = true;
            recenter.write(RecenterRequest);
        }
        PermissionAction::LogRestricted => {
            warn!("Location access is restricted on this device; tracking unavailable");
        }
        PermissionAction::StopTracking => {
            if provider.is_updating() {
                provider.stop_updating_location();
            }
            // A fix from before the denial must not seed routes or recentres
            current.fix = None;
            map_view.shows_user_location = false;
            warn!("Location access denied; user location hidden");
        }
        PermissionAction::Abort(code) => {
            // Intentional abort: unknown statuses are fatal.
            error!("Unsupported location authorization status {code}; terminating");
            exit.write(AppExit::error());
        }
    }
}
