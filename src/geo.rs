//! Geographic primitives: coordinates, visible regions and the map projection.
//!
//! World space is a spherical Web-Mercator plane anchored at an origin coordinate and
//! rescaled so one world unit is one meter at the origin latitude. Keeping the origin
//! near the user keeps positions small enough for `f32` rendering.

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// WGS-84 semi-major axis used by spherical Web Mercator
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Mercator is undefined at the poles; latitudes are clamped to this
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Approximate length of one degree of latitude
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Move by a local east/north offset in meters (small-distance approximation)
    pub fn offset_by_meters(&self, east: f64, north: f64) -> Self {
        let lat = self.latitude + north / METERS_PER_DEGREE_LATITUDE;
        let lon = self.longitude
            + east / (METERS_PER_DEGREE_LATITUDE * self.latitude.to_radians().cos().max(1e-6));
        Self::new(lat, lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// A visible map area: a centre plus an extent in meters.
///
/// `span_meters.x` is the east/west extent, `span_meters.y` the north/south extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub span_meters: DVec2,
}

impl Region {
    pub fn around(center: Coordinate, latitudinal_meters: f64, longitudinal_meters: f64) -> Self {
        Self {
            center,
            span_meters: DVec2::new(longitudinal_meters, latitudinal_meters),
        }
    }

    /// Smallest region containing every coordinate of `path`, grown by `padding_meters`
    /// on each side. Returns `None` for an empty path.
    pub fn bounding(path: &[Coordinate], padding_meters: f64) -> Option<Self> {
        let first = path.first()?;
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);

        for c in &path[1..] {
            min_lat = min_lat.min(c.latitude);
            max_lat = max_lat.max(c.latitude);
            min_lon = min_lon.min(c.longitude);
            max_lon = max_lon.max(c.longitude);
        }

        let center = Coordinate::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0);
        let lat_meters = (max_lat - min_lat) * METERS_PER_DEGREE_LATITUDE;
        let lon_meters =
            (max_lon - min_lon) * METERS_PER_DEGREE_LATITUDE * center.latitude.to_radians().cos();

        Some(Self::around(
            center,
            lat_meters + 2.0 * padding_meters,
            lon_meters + 2.0 * padding_meters,
        ))
    }

    /// Whether `coordinate` lies inside the region (approximate, for small regions)
    #[cfg(test)]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let half_lat = self.span_meters.y / 2.0 / METERS_PER_DEGREE_LATITUDE;
        let half_lon = self.span_meters.x
            / 2.0
            / (METERS_PER_DEGREE_LATITUDE * self.center.latitude.to_radians().cos().max(1e-6));

        (coordinate.latitude - self.center.latitude).abs() <= half_lat + 1e-9
            && (coordinate.longitude - self.center.longitude).abs() <= half_lon + 1e-9
    }

    /// Linear interpolation between two regions, `t` in [0, 1]
    pub fn lerp(&self, to: &Region, t: f64) -> Region {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        Region {
            center: Coordinate::new(
                self.center.latitude + (to.center.latitude - self.center.latitude) * t,
                self.center.longitude + (to.center.longitude - self.center.longitude) * t,
            ),
            span_meters: self.span_meters.lerp(to.span_meters, t),
        }
    }
}

/// Projects coordinates into world space and back.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MapProjection {
    origin_mercator: DVec2,
    scale: f64,
}

impl MapProjection {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin_mercator: mercator(origin),
            scale: clamp_latitude(origin.latitude).to_radians().cos(),
        }
    }

    pub fn to_world(&self, coordinate: Coordinate) -> Vec2 {
        let offset = (mercator(coordinate) - self.origin_mercator) * self.scale;
        offset.as_vec2()
    }

    pub fn to_coordinate(&self, world: Vec2) -> Coordinate {
        let merc = world.as_dvec2() / self.scale + self.origin_mercator;
        Coordinate::new(
            (2.0 * (merc.y / EARTH_RADIUS_METERS).exp().atan() - FRAC_PI_2).to_degrees(),
            (merc.x / EARTH_RADIUS_METERS).to_degrees(),
        )
    }
}

impl Default for MapProjection {
    fn default() -> Self {
        Self::new(Coordinate::new(0.0, 0.0))
    }
}

fn clamp_latitude(latitude: f64) -> f64 {
    latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
}

fn mercator(coordinate: Coordinate) -> DVec2 {
    let lat = clamp_latitude(coordinate.latitude).to_radians();
    DVec2::new(
        EARTH_RADIUS_METERS * coordinate.longitude.to_radians(),
        EARTH_RADIUS_METERS * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    )
}
