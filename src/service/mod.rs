//! The external map service contract
//!
//! Search, look-around imagery and route calculation all live behind
//! [`MapService`]. The screen only ever sees the records defined here.

pub mod catalog;

use crate::core::constants::UNNAMED_PLACE;
use crate::core::geo::{LatLng, LatLngBounds, Region};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A named point of interest returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub coordinate: LatLng,
}

impl Place {
    pub fn new(name: impl Into<String>, coordinate: LatLng) -> Self {
        Self {
            name: Some(name.into()),
            coordinate,
        }
    }

    pub fn unnamed(coordinate: LatLng) -> Self {
        Self {
            name: None,
            coordinate,
        }
    }

    /// Name for markers and panels, "Place" when the service has none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_PLACE)
    }
}

/// A drivable path between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub polyline: Vec<LatLng>,
    pub bounds: LatLngBounds,
    pub distance_meters: f64,
    pub expected_travel_time: Duration,
}

impl Route {
    /// Builds a route whose bounds cover the polyline, `None` without points
    pub fn from_polyline(
        polyline: Vec<LatLng>,
        distance_meters: f64,
        expected_travel_time: Duration,
    ) -> Option<Self> {
        let bounds = LatLngBounds::from_points(&polyline)?;
        Some(Self {
            polyline,
            bounds,
            distance_meters,
            expected_travel_time,
        })
    }
}

/// Opaque reference to a street-level imagery scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewHandle {
    pub scene_id: String,
    pub coordinate: LatLng,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found")]
    NotFound,

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Request/response contract with the mapping backend
#[async_trait]
pub trait MapService: Send + Sync {
    /// Natural-language place search biased towards `bias`
    async fn search(&self, query: &str, bias: &Region) -> ServiceResult<Vec<Place>>;

    /// Street-level scene for a place, `None` when no imagery exists
    async fn look_around(&self, place: &Place) -> ServiceResult<Option<PreviewHandle>>;

    /// Driving route between two points, `None` when no route exists
    async fn calculate_route(&self, from: LatLng, to: &Place) -> ServiceResult<Option<Route>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_display_name() {
        let coffee = Place::new("Coffee Bar", LatLng::new(37.33, -122.03));
        assert_eq!(coffee.display_name(), "Coffee Bar");
        assert_eq!(Place::unnamed(LatLng::new(37.33, -122.03)).display_name(), "Place");
    }

    #[test]
    fn test_place_value_equality() {
        let a = Place::new("Cafe", LatLng::new(1.0, 2.0));
        let b = Place::new("Cafe", LatLng::new(1.0, 2.0));
        let c = Place::new("Cafe", LatLng::new(1.0, 2.5));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_route_bounds_cover_polyline() {
        assert!(Route::from_polyline(Vec::new(), 0.0, Duration::ZERO).is_none());

        let route = Route::from_polyline(
            vec![LatLng::new(37.33, -122.01), LatLng::new(37.40, -121.90)],
            12_000.0,
            Duration::from_secs(900),
        )
        .unwrap();
        assert_eq!(route.bounds.south_west, LatLng::new(37.33, -122.01));
        assert_eq!(route.bounds.north_east, LatLng::new(37.40, -121.90));
    }
}
