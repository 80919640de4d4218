//! The map's view state: visible region, viewport, tracking mode and animations.

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CAMERA_FLIGHT_SECS, DEFAULT_REGION_SPAN_METERS, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    MAX_SPAN_METERS, MIN_SPAN_METERS,
};
use crate::geo::{Coordinate, MapProjection, Region};

/// Basemap palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    Standard,
    /// Satellite imagery colors with roads drawn on top
    #[default]
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserTrackingMode {
    None,
    Follow,
    #[default]
    FollowWithHeading,
}

/// Animated transition between two regions
#[derive(Debug, Clone, Copy)]
pub struct CameraFlight {
    from: Region,
    to: Region,
    elapsed: f32,
    duration: f32,
}

impl CameraFlight {
    pub fn new(from: Region, to: Region, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(f32::EPSILON),
        }
    }

    /// Advance the flight and return the region to show this frame
    pub fn advance(&mut self, dt: f32) -> Region {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.elapsed / self.duration;
        // ease-out cubic
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from.lerp(&self.to, eased as f64)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Resource, Debug)]
pub struct MapView {
    pub style: MapStyle,
    /// Always false; the map stays north-up
    pub rotation_enabled: bool,
    pub tracking_mode: UserTrackingMode,
    pub shows_compass: bool,
    pub shows_user_location: bool,
    pub region: Region,
    /// Size of the drawable area in logical pixels
    pub viewport: Vec2,
    flight: Option<CameraFlight>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            style: MapStyle::default(),
            rotation_enabled: false,
            tracking_mode: UserTrackingMode::default(),
            shows_compass: true,
            shows_user_location: false,
            region: Region::around(
                Coordinate::new(0.0, 0.0),
                DEFAULT_REGION_SPAN_METERS,
                DEFAULT_REGION_SPAN_METERS,
            ),
            viewport: Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            flight: None,
        }
    }
}

impl MapView {
    /// Meters covered by one logical pixel so that the whole region span fits
    pub fn meters_per_pixel(&self) -> f64 {
        let viewport = self.viewport.as_dvec2().max(DVec2::ONE);
        (self.region.span_meters / viewport).max_element()
    }

    pub fn screen_to_coordinate(&self, screen: Vec2, projection: &MapProjection) -> Coordinate {
        let mpp = self.meters_per_pixel() as f32;
        let center = projection.to_world(self.region.center);
        let offset = Vec2::new(
            screen.x - self.viewport.x / 2.0,
            self.viewport.y / 2.0 - screen.y,
        );
        projection.to_coordinate(center + offset * mpp)
    }

    pub fn coordinate_to_screen(&self, coordinate: Coordinate, projection: &MapProjection) -> Vec2 {
        let mpp = self.meters_per_pixel() as f32;
        let center = projection.to_world(self.region.center);
        let offset = (projection.to_world(coordinate) - center) / mpp;
        Vec2::new(
            self.viewport.x / 2.0 + offset.x,
            self.viewport.y / 2.0 - offset.y,
        )
    }

    pub fn set_region(&mut self, region: Region, animated: bool) {
        if animated {
            self.flight = Some(CameraFlight::new(self.region, region, CAMERA_FLIGHT_SECS));
        } else {
            self.flight = None;
            self.region = region;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Step any running region animation
    pub fn advance_flight(&mut self, dt: f32) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        self.region = flight.advance(dt);
        if flight.is_finished() {
            self.flight = None;
        }
    }

    /// Drag the map by a screen-space delta; suspends user tracking
    pub fn pan_by_pixels(&mut self, delta: Vec2, projection: &MapProjection) {
        if delta == Vec2::ZERO {
            return;
        }
        let mpp = self.meters_per_pixel() as f32;
        let center = projection.to_world(self.region.center);
        let moved = center - Vec2::new(delta.x, -delta.y) * mpp;
        self.flight = None;
        self.region.center = projection.to_coordinate(moved);
        self.tracking_mode = UserTrackingMode::None;
    }

    pub fn zoom_by(&mut self, factor: f64) {
        let span = self.region.span_meters * factor;
        let largest = span.max_element();
        let clamped = if largest > MAX_SPAN_METERS {
            span * (MAX_SPAN_METERS / largest)
        } else if span.min_element() < MIN_SPAN_METERS {
            span * (MIN_SPAN_METERS / span.min_element())
        } else {
            span
        };
        self.region.span_meters = clamped;
    }

    /// Keep the user centred while a follow mode is active
    pub fn follow(&mut self, coordinate: Coordinate) {
        if self.tracking_mode == UserTrackingMode::None || self.is_animating() {
            return;
        }
        self.region.center = coordinate;
    }
}
