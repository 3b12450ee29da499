//! In-memory map service backed by a fixed list of places
//!
//! Used by the desktop app and by tests. Search is a case-insensitive name
//! match near the bias region, routes are straight interpolated lines.

use super::{MapService, Place, PreviewHandle, Route, ServiceError, ServiceResult};
use crate::core::geo::{LatLng, Region};
use crate::runtime::async_utils::async_delay;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub place: Place,
    #[serde(default)]
    pub has_look_around: bool,
}

impl CatalogEntry {
    pub fn new(place: Place, has_look_around: bool) -> Self {
        Self {
            place,
            has_look_around,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    /// Places further than this from the bias region's center are not returned
    pub search_radius_meters: f64,
    /// Number of straight segments a route polyline is split into
    pub route_segments: usize,
    /// Average driving speed used for travel time estimates
    pub travel_speed_mps: f64,
    /// Destinations further than this have no route
    pub max_route_meters: f64,
    /// Delay applied to every request, zero in tests
    pub simulated_latency_ms: u64,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            search_radius_meters: 50_000.0,
            route_segments: 16,
            travel_speed_mps: 13.4,
            max_route_meters: 500_000.0,
            simulated_latency_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogMapService {
    #[serde(default)]
    pub options: CatalogOptions,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl CatalogMapService {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            options: CatalogOptions::default(),
            entries,
        }
    }

    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// A handful of places around Cupertino
    pub fn builtin() -> Self {
        let entry = |name: &str, lat: f64, lng: f64, has_look_around: bool| {
            CatalogEntry::new(Place::new(name, LatLng::new(lat, lng)), has_look_around)
        };
        Self::new(vec![
            entry("Coffee Society", 37.3236, -122.0397, true),
            entry("Philz Coffee", 37.3225, -122.0075, true),
            entry("Peet's Coffee", 37.3371, -122.0151, false),
            entry("Cupertino Library", 37.3180, -122.0290, true),
            entry("Main Street Cupertino", 37.3235, -122.0108, true),
            entry("Rancho San Antonio Park", 37.3326, -122.0880, false),
            entry("Santana Row", 37.3210, -121.9480, true),
            entry("San Jose Airport", 37.3639, -121.9289, false),
        ])
    }

    async fn simulate_latency(&self) {
        if self.options.simulated_latency_ms > 0 {
            async_delay(Duration::from_millis(self.options.simulated_latency_ms)).await;
        }
    }

    fn entry_for(&self, place: &Place) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.place == place)
    }
}

#[async_trait]
impl MapService for CatalogMapService {
    async fn search(&self, query: &str, bias: &Region) -> ServiceResult<Vec<Place>> {
        self.simulate_latency().await;

        let needle = query.to_lowercase();
        let mut matches: Vec<(f64, &Place)> = self
            .entries
            .iter()
            .map(|entry| &entry.place)
            .filter(|place| {
                place
                    .name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .map(|place| (place.coordinate.distance_to(&bias.center), place))
            .filter(|(distance, _)| *distance <= self.options.search_radius_meters)
            .collect();

        matches.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(matches.into_iter().map(|(_, place)| place.clone()).collect())
    }

    async fn look_around(&self, place: &Place) -> ServiceResult<Option<PreviewHandle>> {
        self.simulate_latency().await;

        let entry = self.entry_for(place).ok_or(ServiceError::NotFound)?;
        if !entry.has_look_around {
            return Ok(None);
        }
        Ok(Some(PreviewHandle {
            scene_id: format!(
                "scene:{:.5},{:.5}",
                place.coordinate.lat, place.coordinate.lng
            ),
            coordinate: place.coordinate,
        }))
    }

    async fn calculate_route(&self, from: LatLng, to: &Place) -> ServiceResult<Option<Route>> {
        self.simulate_latency().await;

        let distance = from.distance_to(&to.coordinate);
        if distance > self.options.max_route_meters {
            return Ok(None);
        }

        let segments = self.options.route_segments.max(1);
        let polyline: Vec<LatLng> = (0..=segments)
            .map(|i| from.lerp(&to.coordinate, i as f64 / segments as f64))
            .collect();
        let travel_time = if self.options.travel_speed_mps > 0.0 {
            Duration::from_secs_f64(distance / self.options.travel_speed_mps)
        } else {
            Duration::ZERO
        };

        Ok(Route::from_polyline(polyline, distance, travel_time))
    }
}
