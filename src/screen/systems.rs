use bevy::prelude::*;

use crate::constants::USER_REGION_SPAN_METERS;
use crate::geo::{MapProjection, Region};
use crate::location::{CurrentLocation, RecenterRequest};
use crate::map::{
    AnnotationSelected, LongPressBegan, MapView, Pin, RouteOverlay, SetRegion, UserTrackingMode,
};
use crate::routing::{RouteOutcome, RouteRequested, RouteSequence, RouteSettled};

use super::{ClearAllRequest, InteractionPhase, RecenterSchedule};

/// Drop one pin at the coordinate under each new long press
pub fn place_pin_on_long_press(
    mut commands: Commands,
    mut long_presses: MessageReader<LongPressBegan>,
    map_view: Res<MapView>,
    projection: Res<MapProjection>,
    mut phase: ResMut<InteractionPhase>,
) {
    for press in long_presses.read() {
        *phase = InteractionPhase::PinPlaced;
        let coordinate = map_view.screen_to_coordinate(press.screen_point, &projection);
        debug!("Placing pin at {}", coordinate);
        commands.spawn(Pin { coordinate });
        *phase = InteractionPhase::Idle;
    }
}

/// Replace any shown route with a fresh request to the selected pin
pub fn route_to_selected_pin(
    mut commands: Commands,
    mut selections: MessageReader<AnnotationSelected>,
    overlays: Query<Entity, With<RouteOverlay>>,
    mut sequence: ResMut<RouteSequence>,
    mut phase: ResMut<InteractionPhase>,
    mut requests: MessageWriter<RouteRequested>,
) {
    for selection in selections.read() {
        for entity in overlays.iter() {
            commands.entity(entity).despawn();
        }
        // Routes still in flight must not land next to the new one
        sequence.invalidate();
        requests.write(RouteRequested {
            destination: selection.coordinate,
        });
        *phase = InteractionPhase::RouteRequested;
    }
}

pub fn finish_route_request(
    mut settled: MessageReader<RouteSettled>,
    mut phase: ResMut<InteractionPhase>,
) {
    for result in settled.read() {
        debug!("Route request settled: {:?}", result.outcome);
        // A newer request or a clear owns the phase now
        if result.outcome != RouteOutcome::Superseded {
            *phase = InteractionPhase::Idle;
        }
    }
}

pub fn clear_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut clear: MessageWriter<ClearAllRequest>,
) {
    if keyboard.any_just_pressed([KeyCode::Delete, KeyCode::Backspace]) {
        clear.write(ClearAllRequest);
    }
}

/// Remove every pin and overlay, and orphan any in-flight route request
pub fn clear_all(
    mut commands: Commands,
    mut requests: MessageReader<ClearAllRequest>,
    pins: Query<Entity, With<Pin>>,
    overlays: Query<Entity, With<RouteOverlay>>,
    mut sequence: ResMut<RouteSequence>,
    mut phase: ResMut<InteractionPhase>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let mut removed = 0;
    for entity in pins.iter().chain(overlays.iter()) {
        commands.entity(entity).despawn();
        removed += 1;
    }
    sequence.invalidate();
    *phase = InteractionPhase::Idle;
    info!("Cleared {} annotations and overlays", removed);
}

pub fn schedule_recenter(
    mut requests: MessageReader<RecenterRequest>,
    mut schedule: ResMut<RecenterSchedule>,
) {
    for _ in requests.read() {
        schedule.schedule();
        debug!("Recentre scheduled ({} pending)", schedule.pending_count());
    }
}

/// Frame the user once each pending recentre comes due.
///
/// Pending recentres are dropped once the user location is hidden (access revoked).
pub fn run_recenter(
    time: Res<Time>,
    mut schedule: ResMut<RecenterSchedule>,
    current: Res<CurrentLocation>,
    mut map_view: ResMut<MapView>,
    mut set_region: MessageWriter<SetRegion>,
) {
    if !map_view.shows_user_location {
        if schedule.pending_count() > 0 {
            debug!("User location hidden; cancelling pending recentres");
            schedule.cancel();
        }
        return;
    }

    for _ in 0..schedule.tick(time.delta()) {
        let Some(fix) = current.fix else {
            debug!("Recentre due but no location yet");
            continue;
        };
        map_view.tracking_mode = UserTrackingMode::FollowWithHeading;
        set_region.write(SetRegion {
            region: Region::around(
                fix.coordinate,
                USER_REGION_SPAN_METERS,
                USER_REGION_SPAN_METERS,
            ),
            animated: true,
        });
    }
}
