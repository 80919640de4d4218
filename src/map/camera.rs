use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::geo::MapProjection;
use crate::location::UserLocationUpdated;

use super::SetRegion;
use super::view::MapView;

#[derive(Component)]
pub struct MapCamera;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Track the window size so screen/coordinate conversion matches what is drawn
pub fn update_viewport_size(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut map_view: ResMut<MapView>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if size.x > 0.0 && size.y > 0.0 && map_view.viewport != size {
        map_view.viewport = size;
    }
}

pub fn apply_set_region(mut events: MessageReader<SetRegion>, mut map_view: ResMut<MapView>) {
    for event in events.read() {
        debug!(
            "Setting region centre {} span {:.0}x{:.0} m (animated: {})",
            event.region.center,
            event.region.span_meters.x,
            event.region.span_meters.y,
            event.animated
        );
        map_view.set_region(event.region, event.animated);
    }
}

pub fn animate_region(time: Res<Time>, mut map_view: ResMut<MapView>) {
    if map_view.is_animating() {
        map_view.advance_flight(time.delta_secs());
    }
}

pub fn follow_user_location(
    mut events: MessageReader<UserLocationUpdated>,
    mut map_view: ResMut<MapView>,
) {
    if let Some(UserLocationUpdated(fix)) = events.read().last()
        && map_view.shows_user_location
    {
        map_view.follow(fix.coordinate);
    }
}

/// Place the camera over the region centre with a scale that fits the span
pub fn sync_camera(
    map_view: Res<MapView>,
    projection: Res<MapProjection>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MapCamera>>,
) {
    let Ok((mut transform, mut camera_projection)) = camera_query.single_mut() else {
        return;
    };

    let center = projection.to_world(map_view.region.center);
    transform.translation.x = center.x;
    transform.translation.y = center.y;

    if let Projection::Orthographic(ref mut ortho) = *camera_projection {
        ortho.scale = map_view.meters_per_pixel() as f32;
    }
}
