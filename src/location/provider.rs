//! The location service seam and its desktop adapter.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::LocationSourceConfig;
use crate::geo::Coordinate;

use super::permission::AuthorizationStatus;

/// A single position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    /// Device heading in degrees clockwise from north, when known
    pub heading_degrees: Option<f64>,
}

/// Notifications delivered by a location service, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    AuthorizationChanged(AuthorizationStatus),
    LocationUpdated(Fix),
}

/// Host location subsystem: authorization state, update control and a notification queue.
///
/// Implementations queue their notifications; the app drains them once per frame on the
/// UI thread, so no callback ever runs concurrently with map state.
pub trait LocationProvider: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask for foreground-only access. Has no effect unless the status is `NotDetermined`;
    /// the outcome arrives later as `LocationEvent::AuthorizationChanged`.
    fn request_when_in_use_authorization(&mut self);

    fn set_desired_accuracy(&mut self, meters: f64);

    fn start_updating_location(&mut self);

    fn stop_updating_location(&mut self);

    fn is_updating(&self) -> bool;

    /// Advance by `elapsed` and return every notification raised since the last poll.
    fn poll_events(&mut self, elapsed: Duration) -> Vec<LocationEvent>;
}

/// Used when the configured interval is not representable
const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// Location service backed by configuration instead of hardware.
///
/// Reports a fixed position (optionally drifting east between updates) and answers an
/// authorization request with a configured status.
pub struct SimulatedLocationProvider {
    status: AuthorizationStatus,
    granted_status: AuthorizationStatus,
    fix: Fix,
    drift_meters_per_update: f64,
    update_interval: Duration,
    desired_accuracy_meters: Option<f64>,
    updating: bool,
    since_last_update: Duration,
    pending: VecDeque<LocationEvent>,
}

impl SimulatedLocationProvider {
    pub fn from_config(config: &LocationSourceConfig) -> Self {
        Self {
            status: config.initial_status,
            granted_status: config.granted_status,
            fix: Fix {
                coordinate: Coordinate::new(config.latitude, config.longitude),
                heading_degrees: config.heading_degrees,
            },
            drift_meters_per_update: config.drift_meters_per_update,
            update_interval: Duration::try_from_secs_f32(config.update_interval_secs.max(0.05))
                .unwrap_or(DEFAULT_UPDATE_INTERVAL),
            desired_accuracy_meters: None,
            updating: false,
            since_last_update: Duration::ZERO,
            pending: VecDeque::new(),
        }
    }

    #[cfg(test)]
    pub fn desired_accuracy_meters(&self) -> Option<f64> {
        self.desired_accuracy_meters
    }

    fn emit_fix(&mut self) {
        self.pending.push_back(LocationEvent::LocationUpdated(self.fix));
        if self.drift_meters_per_update != 0.0 {
            self.fix.coordinate = self
                .fix
                .coordinate
                .offset_by_meters(self.drift_meters_per_update, 0.0);
        }
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_when_in_use_authorization(&mut self) {
        if self.status != AuthorizationStatus::NotDetermined {
            return;
        }
        self.status = self.granted_status;
        self.pending
            .push_back(LocationEvent::AuthorizationChanged(self.status));
    }

    fn set_desired_accuracy(&mut self, meters: f64) {
        self.desired_accuracy_meters = Some(meters);
    }

    fn start_updating_location(&mut self) {
        if self.updating {
            return;
        }
        self.updating = true;
        self.since_last_update = Duration::ZERO;
        self.emit_fix();
    }

    fn stop_updating_location(&mut self) {
        self.updating = false;
    }

    fn is_updating(&self) -> bool {
        self.updating
    }

    fn poll_events(&mut self, elapsed: Duration) -> Vec<LocationEvent> {
        if self.updating {
            self.since_last_update += elapsed;
            while self.since_last_update >= self.update_interval {
                self.since_last_update -= self.update_interval;
                self.emit_fix();
            }
        }
        self.pending.drain(..).collect()
    }
}
