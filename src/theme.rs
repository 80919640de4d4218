//! Centralized color theme for the application.
//!
//! This module provides all colors used for map rendering and the egui overlay.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

use crate::map::MapStyle;

// ============================================================================
// Basemap Colors
// ============================================================================

/// Palette for one basemap style
pub struct BasemapPalette {
    pub background: Color,
    pub minor_line: Color,
    pub major_line: Color,
}

/// Light "paper" palette for the standard style
pub const STANDARD_BASEMAP: BasemapPalette = BasemapPalette {
    background: Color::srgb(0.94, 0.93, 0.90),
    minor_line: Color::srgba(0.55, 0.55, 0.55, 0.25),
    major_line: Color::srgba(0.95, 0.75, 0.35, 0.9),
};

/// Dark imagery-like palette with bright road-colored major lines
pub const HYBRID_BASEMAP: BasemapPalette = BasemapPalette {
    background: Color::srgb(0.11, 0.16, 0.12),
    minor_line: Color::srgba(0.8, 0.8, 0.8, 0.12),
    major_line: Color::srgba(1.0, 0.86, 0.45, 0.7),
};

pub fn basemap_palette(style: MapStyle) -> &'static BasemapPalette {
    match style {
        MapStyle::Standard => &STANDARD_BASEMAP,
        MapStyle::Hybrid => &HYBRID_BASEMAP,
    }
}

// ============================================================================
// Annotation Colors
// ============================================================================

/// Red pin head
pub const PIN_HEAD: Color = Color::srgb(0.92, 0.2, 0.2);

/// White ring around the pin head
pub const PIN_RING: Color = Color::WHITE;

/// User location dot
pub const USER_LOCATION: Color = Color::srgb(0.0, 0.48, 1.0);

/// Translucent heading wedge in front of the user dot
pub const USER_HEADING: Color = Color::srgba(0.0, 0.48, 1.0, 0.45);

/// Route polyline stroke
pub const ROUTE_STROKE: Color = Color::srgb(0.0, 1.0, 1.0);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Red north marker on the compass
    pub const COMPASS_NORTH: egui::Color32 = egui::Color32::from_rgb(230, 60, 60);

    /// Translucent dark background behind floating controls
    pub const CONTROL_BACKGROUND: egui::Color32 = egui::Color32::from_black_alpha(170);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (preserving alpha)
pub fn bevy_to_egui(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}
