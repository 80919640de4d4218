//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels (also the viewport size before the window reports)
pub const DEFAULT_WINDOW_WIDTH: f32 = 430.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 880.0;

/// Desired location accuracy requested once authorization is granted, in meters
pub const DESIRED_ACCURACY_METERS: f64 = 50.0;

/// Delay between an authorization grant and the initial camera recentre, in seconds
pub const RECENTER_DELAY_SECS: f32 = 1.2;

/// North/south and east/west extent of the region shown when recentring on the user
pub const USER_REGION_SPAN_METERS: f64 = 1000.0;

/// Extent of the region shown before the first recentre
pub const DEFAULT_REGION_SPAN_METERS: f64 = 50_000.0;

/// Padding added on each side of a route's bounding region, in meters
pub const ROUTE_PADDING_METERS: f64 = 300.0;

/// Minimum hold before a press becomes a long press, in seconds
pub const LONG_PRESS_MIN_DURATION_SECS: f32 = 0.3;

/// Pointer travel (pixels) allowed during a press before it turns into a pan
pub const PRESS_SLOP_PIXELS: f32 = 8.0;

/// Radius (pixels) around a pin that counts as selecting it
pub const PIN_HIT_RADIUS_PIXELS: f32 = 18.0;

/// Route polyline stroke width in pixels
pub const ROUTE_STROKE_WIDTH: f32 = 5.0;

/// Duration of an animated region change, in seconds
pub const CAMERA_FLIGHT_SECS: f32 = 0.35;

/// Smallest and largest span the map may zoom to, in meters
pub const MIN_SPAN_METERS: f64 = 100.0;
pub const MAX_SPAN_METERS: f64 = 20_000_000.0;

/// Margin between the screen edge and overlaid controls (stand-in for the safe area)
pub const SAFE_AREA_MARGIN: f32 = 12.0;

/// Message shown once at launch
pub const INSTRUCTIONS_MESSAGE: &str = "Set a pin: long press. Show route: select pin.";
