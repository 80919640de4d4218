//! Gizmo rendering for the basemap graticule, pins, user location and route overlays.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::constants::ROUTE_STROKE_WIDTH;
use crate::geo::MapProjection;
use crate::location::CurrentLocation;
use crate::theme;

use super::annotations::{Pin, RouteOverlay};
use super::view::{MapView, UserTrackingMode};

/// Gizmo group with the fixed route stroke width
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct RouteGizmoGroup;

pub fn configure_route_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<RouteGizmoGroup>();
    config.line.width = ROUTE_STROKE_WIDTH;
}

/// Pick a graticule spacing of 1, 2 or 5 times a power of ten giving ~8 lines per span
pub fn graticule_step_meters(span_meters: f64) -> f64 {
    let raw = (span_meters / 8.0).max(1.0);
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

pub fn apply_map_style(map_view: Res<MapView>, mut clear_color: ResMut<ClearColor>) {
    if map_view.is_changed() {
        let background = theme::basemap_palette(map_view.style).background;
        if clear_color.0 != background {
            clear_color.0 = background;
        }
    }
}

pub fn draw_basemap(mut gizmos: Gizmos, map_view: Res<MapView>, projection: Res<MapProjection>) {
    let palette = theme::basemap_palette(map_view.style);
    let mpp = map_view.meters_per_pixel() as f32;
    let center = projection.to_world(map_view.region.center);
    let half = map_view.viewport * mpp / 2.0;

    let step = graticule_step_meters(map_view.region.span_meters.max_element()) as f32;
    let start_x = ((center.x - half.x) / step).floor() as i32;
    let end_x = ((center.x + half.x) / step).ceil() as i32;
    let start_y = ((center.y - half.y) / step).floor() as i32;
    let end_y = ((center.y + half.y) / step).ceil() as i32;

    let color_for = |index: i32| {
        if index % 5 == 0 {
            palette.major_line
        } else {
            palette.minor_line
        }
    };

    for x in start_x..=end_x {
        let x_pos = x as f32 * step;
        gizmos.line_2d(
            Vec2::new(x_pos, start_y as f32 * step),
            Vec2::new(x_pos, end_y as f32 * step),
            color_for(x),
        );
    }

    for y in start_y..=end_y {
        let y_pos = y as f32 * step;
        gizmos.line_2d(
            Vec2::new(start_x as f32 * step, y_pos),
            Vec2::new(end_x as f32 * step, y_pos),
            color_for(y),
        );
    }
}

pub fn draw_pins(
    mut gizmos: Gizmos,
    pins: Query<&Pin>,
    map_view: Res<MapView>,
    projection: Res<MapProjection>,
) {
    let mpp = map_view.meters_per_pixel() as f32;

    for pin in pins.iter() {
        let tip = projection.to_world(pin.coordinate);
        let head = tip + Vec2::new(0.0, 22.0 * mpp);
        gizmos.line_2d(tip, head, theme::PIN_RING);
        gizmos.circle_2d(head, 8.0 * mpp, theme::PIN_RING);
        for radius in [2.0, 4.0, 6.0] {
            gizmos.circle_2d(head, radius * mpp, theme::PIN_HEAD);
        }
    }
}

pub fn draw_user_location(
    mut gizmos: Gizmos,
    current: Res<CurrentLocation>,
    map_view: Res<MapView>,
    projection: Res<MapProjection>,
) {
    if !map_view.shows_user_location {
        return;
    }
    let Some(fix) = current.fix else {
        return;
    };

    let mpp = map_view.meters_per_pixel() as f32;
    let position = projection.to_world(fix.coordinate);

    gizmos.circle_2d(position, 9.0 * mpp, Color::WHITE);
    for radius in [2.0, 4.0, 6.0] {
        gizmos.circle_2d(position, radius * mpp, theme::USER_LOCATION);
    }

    if map_view.tracking_mode == UserTrackingMode::FollowWithHeading
        && let Some(heading) = fix.heading_degrees
    {
        // heading is clockwise from north; world y points north
        let angle = (90.0 - heading as f32).to_radians();
        let direction = Vec2::from_angle(angle);
        let left = Vec2::from_angle(angle + 0.45);
        let right = Vec2::from_angle(angle - 0.45);
        let apex = position + direction * 26.0 * mpp;
        gizmos.line_2d(position + left * 11.0 * mpp, apex, theme::USER_HEADING);
        gizmos.line_2d(position + right * 11.0 * mpp, apex, theme::USER_HEADING);
    }
}

pub fn draw_route_overlays(
    mut gizmos: Gizmos<RouteGizmoGroup>,
    overlays: Query<&RouteOverlay>,
    projection: Res<MapProjection>,
) {
    for overlay in overlays.iter() {
        if overlay.polyline.len() < 2 {
            continue;
        }
        gizmos.linestrip_2d(
            overlay.polyline.iter().map(|c| projection.to_world(*c)),
            theme::ROUTE_STROKE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_step_is_nice() {
        assert_eq!(graticule_step_meters(1000.0), 200.0);
        assert_eq!(graticule_step_meters(9000.0), 2000.0);
        assert_eq!(graticule_step_meters(50_000.0), 10_000.0);
        assert_eq!(graticule_step_meters(300.0), 50.0);
    }

    #[test]
    fn test_graticule_step_has_floor() {
        assert_eq!(graticule_step_meters(0.0), 1.0);
    }
}
