use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geo::Coordinate;
use crate::location::AuthorizationStatus;
use crate::map::MapStyle;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Public OSRM demo server; swap for a self-hosted instance in production
pub const DEFAULT_DIRECTIONS_URL: &str = "https://router.project-osrm.org";

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Base URL of an OSRM-compatible directions server
    #[serde(default = "default_directions_url")]
    pub directions_url: String,

    /// Timeout for a single directions request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Basemap palette
    #[serde(default)]
    pub map_style: MapStyle,

    /// Simulated location source (desktop builds have no positioning hardware)
    #[serde(default)]
    pub location: LocationSourceConfig,

    /// Show the instructional alert at launch
    #[serde(default = "default_true")]
    pub show_instructions: bool,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            directions_url: default_directions_url(),
            request_timeout_secs: default_request_timeout_secs(),
            map_style: MapStyle::default(),
            location: LocationSourceConfig::default(),
            show_instructions: true,
        }
    }
}

/// Settings for the simulated location service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSourceConfig {
    /// Authorization status reported at launch
    #[serde(default)]
    pub initial_status: AuthorizationStatus,
    /// Status the user "chooses" when asked for permission
    #[serde(default = "default_granted_status")]
    pub granted_status: AuthorizationStatus,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub heading_degrees: Option<f64>,
    /// Eastward movement between consecutive fixes
    #[serde(default)]
    pub drift_meters_per_update: f64,
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: f32,
}

impl Default for LocationSourceConfig {
    fn default() -> Self {
        Self {
            initial_status: AuthorizationStatus::NotDetermined,
            granted_status: default_granted_status(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            heading_degrees: None,
            drift_meters_per_update: 0.0,
            update_interval_secs: default_update_interval_secs(),
        }
    }
}

fn default_directions_url() -> String {
    DEFAULT_DIRECTIONS_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_granted_status() -> AuthorizationStatus {
    AuthorizationStatus::AuthorizedWhenInUse
}

fn default_latitude() -> f64 {
    37.3349
}

fn default_longitude() -> f64 {
    -122.00902
}

fn default_update_interval_secs() -> f32 {
    1.0
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Parse config JSON, falling back to defaults with a reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str::<AppConfigData>(json) {
        Ok(mut data) => {
            let location = &data.location;
            let coordinate = Coordinate::new(location.latitude, location.longitude);
            if coordinate.is_valid() {
                (data, None)
            } else {
                warn!("Configured location {} is out of range", coordinate);
                data.location = LocationSourceConfig::default();
                (
                    data,
                    Some(format!(
                        "Location {} is not a valid coordinate; the default location is in use",
                        coordinate
                    )),
                )
            }
        }
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config() -> (AppConfig, Option<String>) {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    (AppConfig { data, config_path }, reset_reason)
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let (loaded, reset_reason) = load_config();
    *config = loaded;

    debug!(
        "Directions service: {} (timeout {}s)",
        config.data.directions_url, config.data.request_timeout_secs
    );

    // Set notification if config was reset due to an error
    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.directions_url, DEFAULT_DIRECTIONS_URL);
        assert_eq!(data.map_style, MapStyle::Hybrid);
        assert!(data.show_instructions);
        assert_eq!(
            data.location.initial_status,
            AuthorizationStatus::NotDetermined
        );
        assert_eq!(
            data.location.granted_status,
            AuthorizationStatus::AuthorizedWhenInUse
        );
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let (data, reason) = parse_config("{}");
        assert!(reason.is_none());
        assert_eq!(data.request_timeout_secs, 15);
        assert_eq!(data.location, LocationSourceConfig::default());
    }

    #[test]
    fn test_partial_location_section() {
        let json = r#"{
            "directions_url": "http://localhost:5000",
            "location": { "initial_status": "denied", "latitude": 48.8584 }
        }"#;

        let (data, reason) = parse_config(json);
        assert!(reason.is_none());
        assert_eq!(data.directions_url, "http://localhost:5000");
        assert_eq!(data.location.initial_status, AuthorizationStatus::Denied);
        assert_eq!(data.location.latitude, 48.8584);
        assert_eq!(data.location.longitude, default_longitude());
    }

    #[test]
    fn test_corrupt_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data.directions_url, DEFAULT_DIRECTIONS_URL);
        assert!(reason.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_out_of_range_location_resets_location_only() {
        let json = r#"{
            "directions_url": "http://localhost:5000",
            "location": { "latitude": 123.0, "initial_status": "denied" }
        }"#;

        let (data, reason) = parse_config(json);
        assert_eq!(data.directions_url, "http://localhost:5000");
        assert_eq!(data.location, LocationSourceConfig::default());
        assert!(reason.unwrap().contains("not a valid coordinate"));
    }

    #[test]
    fn test_app_config_data_serialization() {
        let mut data = AppConfigData::default();
        data.map_style = MapStyle::Standard;
        data.location.heading_degrees = Some(45.0);

        let json = serde_json::to_string(&data).unwrap();
        let (parsed, _) = parse_config(&json);

        assert_eq!(parsed.map_style, MapStyle::Standard);
        assert_eq!(parsed.location, data.location);
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
