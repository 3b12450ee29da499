use crate::core::geo::{LatLng, LatLngBounds, Region};
use serde::{Deserialize, Serialize};

/// What the map viewport is asked to show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraPosition {
    /// Center and span
    Region(Region),
    /// Fit a bounding rectangle, e.g. a route's bounds
    Rect(LatLngBounds),
}

impl CameraPosition {
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Region(region) => region.is_valid(),
            Self::Rect(bounds) => bounds.is_valid(),
        }
    }

    pub fn center(&self) -> LatLng {
        match self {
            Self::Region(region) => region.center,
            Self::Rect(bounds) => bounds.center(),
        }
    }

    /// The region the camera covers, rectangles converted to center + span
    pub fn region(&self) -> Region {
        match self {
            Self::Region(region) => *region,
            Self::Rect(bounds) => Region::from(bounds),
        }
    }
}

impl From<Region> for CameraPosition {
    fn from(region: Region) -> Self {
        Self::Region(region)
    }
}
