//! Annotation and overlay components plus screen-space hit testing.

use bevy::prelude::*;

use crate::constants::PIN_HIT_RADIUS_PIXELS;
use crate::geo::{Coordinate, MapProjection, Region};

use super::view::MapView;

/// A user-placed point marker. The entity is its display identity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub coordinate: Coordinate,
}

/// A rendered driving route.
#[derive(Component, Debug, Clone)]
pub struct RouteOverlay {
    pub polyline: Vec<Coordinate>,
    pub region: Region,
    pub distance_meters: f64,
    pub expected_travel_time_secs: f64,
}

/// Find the pin closest to `screen_point` within the hit radius
pub fn pin_at_screen_point<'a>(
    screen_point: Vec2,
    pins: impl IntoIterator<Item = &'a Pin>,
    view: &MapView,
    projection: &MapProjection,
) -> Option<Pin> {
    pins.into_iter()
        .map(|pin| {
            let distance = view
                .coordinate_to_screen(pin.coordinate, projection)
                .distance(screen_point);
            (pin, distance)
        })
        .filter(|(_, distance)| *distance <= PIN_HIT_RADIUS_PIXELS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(pin, _)| *pin)
}
