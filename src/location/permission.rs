//! Location authorization states and the decision procedure that reacts to them.

use serde::{Deserialize, Serialize};

/// The platform's current grant level for location access.
///
/// The application only reads this; the single transition it may request is out of
/// `NotDetermined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
    /// A raw status code introduced after this application was written.
    Unsupported(u32),
}

/// What the coordinator does in response to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    /// Ask for foreground-only authorization and wait for the change notification
    RequestWhenInUse,
    /// Configure accuracy, start updates, show the user and schedule a recentre
    StartTracking,
    /// Feature unavailable; log only
    LogRestricted,
    /// Stop updates if running and hide the user location
    StopTracking,
    /// Unknown status: terminate instead of guessing how to degrade
    Abort(u32),
}

pub fn decide(status: AuthorizationStatus) -> PermissionAction {
    match status {
        AuthorizationStatus::NotDetermined => PermissionAction::RequestWhenInUse,
        AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse => {
            PermissionAction::StartTracking
        }
        AuthorizationStatus::Restricted => PermissionAction::LogRestricted,
        AuthorizationStatus::Denied => PermissionAction::StopTracking,
        AuthorizationStatus::Unsupported(code) => PermissionAction::Abort(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_not_determined() {
        assert_eq!(AuthorizationStatus::default(), AuthorizationStatus::NotDetermined);
    }

    #[test]
    fn test_decide_not_determined_requests() {
        assert_eq!(
            decide(AuthorizationStatus::NotDetermined),
            PermissionAction::RequestWhenInUse
        );
    }

    #[test]
    fn test_decide_both_authorized_states_start_tracking() {
        assert_eq!(
            decide(AuthorizationStatus::AuthorizedAlways),
            PermissionAction::StartTracking
        );
        assert_eq!(
            decide(AuthorizationStatus::AuthorizedWhenInUse),
            PermissionAction::StartTracking
        );
    }

    #[test]
    fn test_decide_restricted_and_denied() {
        assert_eq!(
            decide(AuthorizationStatus::Restricted),
            PermissionAction::LogRestricted
        );
        assert_eq!(decide(AuthorizationStatus::Denied), PermissionAction::StopTracking);
    }

    #[test]
    fn test_decide_unsupported_aborts_with_code() {
        assert_eq!(
            decide(AuthorizationStatus::Unsupported(9)),
            PermissionAction::Abort(9)
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&AuthorizationStatus::AuthorizedWhenInUse).unwrap();
        assert_eq!(json, "\"authorized_when_in_use\"");

        let parsed: AuthorizationStatus = serde_json::from_str("{\"unsupported\":4}").unwrap();
        assert_eq!(parsed, AuthorizationStatus::Unsupported(4));
    }
}
