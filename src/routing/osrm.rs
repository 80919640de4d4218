//! Directions over an OSRM-compatible HTTP API.
//!
//! Requests `/route/v1/{profile}/{lon},{lat};{lon},{lat}` with full GeoJSON geometry and
//! alternatives enabled. Any host speaking the OSRM v1 route protocol works; point
//! `directions_url` in the config at a self-hosted instance for production use.

use serde::Deserialize;
use std::time::Duration;

use crate::geo::Coordinate;

use super::service::{DirectionsError, DirectionsRequest, DirectionsService, Route};

/// OSRM status meaning the request was valid but no road path exists
const NO_ROUTE_CODE: &str = "NoRoute";

const ROUTE_QUERY: &str = "overview=full&geometries=geojson&alternatives=true";

#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    pub geometry: OsrmGeometry,
}

/// GeoJSON LineString; positions are `[longitude, latitude]`
#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

pub struct OsrmDirections {
    base_url: String,
    agent: ureq::Agent,
}

impl OsrmDirections {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("pinroute/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn route_url(&self, request: &DirectionsRequest) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?{}",
            self.base_url,
            request.transport.profile(),
            request.source.longitude,
            request.source.latitude,
            request.destination.longitude,
            request.destination.latitude,
            ROUTE_QUERY,
        )
    }
}

impl DirectionsService for OsrmDirections {
    fn calculate(&self, request: &DirectionsRequest) -> Result<Vec<Route>, DirectionsError> {
        let url = self.route_url(request);

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            // OSRM reports failures like NoRoute with a JSON body on 4xx
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(DirectionsError::Transport(Box::new(e))),
        };

        let body: OsrmResponse = response.into_json()?;
        into_routes(body)
    }
}

pub fn into_routes(response: OsrmResponse) -> Result<Vec<Route>, DirectionsError> {
    match response.code.as_str() {
        "Ok" => Ok(response
            .routes
            .into_iter()
            .map(|route| Route {
                polyline: route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect(),
                distance_meters: route.distance,
                expected_travel_time_secs: route.duration,
            })
            .collect()),
        NO_ROUTE_CODE => Ok(Vec::new()),
        _ => Err(DirectionsError::Service {
            message: response.message.unwrap_or_default(),
            code: response.code,
        }),
    }
}
