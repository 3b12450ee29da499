use serde::{Deserialize, Serialize};

/// Mean equatorial radius used for great-circle distances
const EARTH_RADIUS: f64 = 6378137.0;

/// Length of one degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS * std::f64::consts::PI / 180.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Linear interpolation towards `other`, `t` in [0, 1]
    pub fn lerp(&self, other: &LatLng, t: f64) -> LatLng {
        LatLng::new(
            self.lat + (other.lat - self.lat) * t,
            self.lng + (other.lng - self.lng) * t,
        )
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds covering every point, `None` for an empty slice
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for point in rest {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid()
            && self.north_east.is_valid()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }
}

/// A map viewport descriptor: center coordinate plus span in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: LatLng,
    /// Latitude and longitude deltas covered by the region
    pub span: LatLng,
}

impl Region {
    pub fn new(center: LatLng, span: LatLng) -> Self {
        Self { center, span }
    }

    /// Builds a region covering the given distances around `center`
    pub fn from_meters(center: LatLng, latitudinal_meters: f64, longitudinal_meters: f64) -> Self {
        let lat_delta = latitudinal_meters / METERS_PER_DEGREE;
        // Longitude degrees shrink towards the poles
        let cos_lat = center.lat.to_radians().cos().abs().max(1e-6);
        let lng_delta = (longitudinal_meters / (METERS_PER_DEGREE * cos_lat)).min(360.0);
        Self::new(center, LatLng::new(lat_delta.min(180.0), lng_delta))
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_valid()
            && self.span.lat.is_finite()
            && self.span.lng.is_finite()
            && self.span.lat >= 0.0
            && self.span.lng >= 0.0
    }

    pub fn bounds(&self) -> LatLngBounds {
        let half_lat = self.span.lat / 2.0;
        let half_lng = self.span.lng / 2.0;
        LatLngBounds::from_coords(
            self.center.lat - half_lat,
            self.center.lng - half_lng,
            self.center.lat + half_lat,
            self.center.lng + half_lng,
        )
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        self.bounds().contains(point)
    }
}

impl From<&LatLngBounds> for Region {
    fn from(bounds: &LatLngBounds) -> Self {
        Region::new(bounds.center(), bounds.span())
    }
}
