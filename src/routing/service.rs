//! Directions request/response types and the service seam.

use thiserror::Error;

use crate::constants::ROUTE_PADDING_METERS;
use crate::geo::{Coordinate, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportType {
    #[default]
    Automobile,
}

impl TransportType {
    /// OSRM profile name
    pub fn profile(&self) -> &'static str {
        match self {
            TransportType::Automobile => "driving",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub transport: TransportType,
}

impl DirectionsRequest {
    pub fn driving(source: Coordinate, destination: Coordinate) -> Self {
        Self {
            source,
            destination,
            transport: TransportType::Automobile,
        }
    }
}

/// One candidate route
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub polyline: Vec<Coordinate>,
    pub distance_meters: f64,
    pub expected_travel_time_secs: f64,
}

impl Route {
    /// Padded region framing the whole path
    pub fn bounding_region(&self) -> Option<Region> {
        Region::bounding(&self.polyline, ROUTE_PADDING_METERS)
    }
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Transport(#[source] Box<ureq::Error>),
    #[error("could not decode directions response: {0}")]
    Decode(#[from] std::io::Error),
    #[error("directions service returned {code}: {message}")]
    Service { code: String, message: String },
}

/// External routing service.
///
/// `calculate` blocks on the network and must only be called from a background task.
pub trait DirectionsService: Send + Sync {
    fn calculate(&self, request: &DirectionsRequest) -> Result<Vec<Route>, DirectionsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driving_request_uses_automobile() {
        let request = DirectionsRequest::driving(
            Coordinate::new(1.0, 2.0),
            Coordinate::new(3.0, 4.0),
        );
        assert_eq!(request.transport, TransportType::Automobile);
        assert_eq!(request.transport.profile(), "driving");
    }

    #[test]
    fn test_route_bounding_region_is_padded() {
        let route = Route {
            polyline: vec![Coordinate::new(37.33, -122.03), Coordinate::new(37.34, -122.01)],
            distance_meters: 2100.0,
            expected_travel_time_secs: 240.0,
        };
        let region = route.bounding_region().unwrap();
        let tight = Region::bounding(&route.polyline, 0.0).unwrap();

        let padding = region.span_meters - tight.span_meters;
        assert!((padding.x - 2.0 * ROUTE_PADDING_METERS).abs() < 1e-6);
        assert!((padding.y - 2.0 * ROUTE_PADDING_METERS).abs() < 1e-6);
    }

    #[test]
    fn test_empty_route_has_no_region() {
        let route = Route {
            polyline: vec![],
            distance_meters: 0.0,
            expected_travel_time_secs: 0.0,
        };
        assert!(route.bounding_region().is_none());
    }

    #[test]
    fn test_service_error_display() {
        let err = DirectionsError::Service {
            code: "InvalidQuery".to_string(),
            message: "bad coordinates".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "directions service returned InvalidQuery: bad coordinates"
        );
    }
}
