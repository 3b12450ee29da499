//! Configuration for the map screen's behaviour
//!
//! Presets cover the common choices (`ScreenProfile`), and every setting can
//! also be loaded from JSON. Missing JSON fields fall back to the balanced
//! defaults.

use crate::core::constants::{HOME_LOCATION, HOME_REGION_METERS, SCREEN_TITLE};
use crate::core::geo::{LatLng, Region};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How completions of overlapping requests of the same kind are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Whichever completion arrives last overwrites the state
    LastCompletion,
    /// Only the completion of the most recently issued request is applied
    LatestRequest,
}

/// What a failed or empty route calculation does to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteFailurePolicy {
    /// Remain idle and record a route notice; the detail panel stays open
    StayIdle,
    /// Enter route display with no geometry and hide the detail panel
    DisplayEmpty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenProfile {
    /// Last-completion sequencing, failed routes stay idle
    Balanced,
    /// Reproduces the unguarded behaviour of the original screen
    Original,
    /// Token-checked sequencing everywhere, failed routes stay idle
    Strict,
    Custom(ScreenConfig),
}

impl ScreenProfile {
    pub fn resolve(&self) -> ScreenConfig {
        match self {
            Self::Balanced => ScreenConfig {
                home: HomeConfig::default(),
                search: SearchConfig {
                    sequencing: SequencePolicy::LastCompletion,
                },
                preview: PreviewConfig {
                    sequencing: SequencePolicy::LastCompletion,
                },
                route: RouteConfig {
                    failure_policy: RouteFailurePolicy::StayIdle,
                },
            },
            Self::Original => ScreenConfig {
                home: HomeConfig::default(),
                search: SearchConfig {
                    sequencing: SequencePolicy::LastCompletion,
                },
                preview: PreviewConfig {
                    sequencing: SequencePolicy::LastCompletion,
                },
                route: RouteConfig {
                    failure_policy: RouteFailurePolicy::DisplayEmpty,
                },
            },
            Self::Strict => ScreenConfig {
                home: HomeConfig::default(),
                search: SearchConfig {
                    sequencing: SequencePolicy::LatestRequest,
                },
                preview: PreviewConfig {
                    sequencing: SequencePolicy::LatestRequest,
                },
                route: RouteConfig {
                    failure_policy: RouteFailurePolicy::StayIdle,
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for ScreenProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub home: HomeConfig,
    pub search: SearchConfig,
    pub preview: PreviewConfig,
    pub route: RouteConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenProfile::default().resolve()
    }
}

impl ScreenConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScreenConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.home.validate()
    }
}

/// Where the screen considers "home": the route origin and the reset viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub location: LatLng,
    pub latitudinal_meters: f64,
    pub longitudinal_meters: f64,
    pub title: String,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            location: LatLng::new(HOME_LOCATION.0, HOME_LOCATION.1),
            latitudinal_meters: HOME_REGION_METERS.0,
            longitudinal_meters: HOME_REGION_METERS.1,
            title: SCREEN_TITLE.to_string(),
        }
    }
}

impl HomeConfig {
    pub fn region(&self) -> Region {
        Region::from_meters(
            self.location,
            self.latitudinal_meters,
            self.longitudinal_meters,
        )
    }

    fn validate(&self) -> Result<()> {
        if !self.location.is_valid() {
            return Err(MapError::Config(format!(
                "home location out of range: {}, {}",
                self.location.lat, self.location.lng
            )));
        }
        for (axis, meters) in [
            ("latitudinal", self.latitudinal_meters),
            ("longitudinal", self.longitudinal_meters),
        ] {
            if !meters.is_finite() || meters <= 0.0 {
                return Err(MapError::Config(format!(
                    "{axis} extent must be a positive distance, got {meters}"
                )));
            }
        }
        if !self.region().is_valid() {
            return Err(MapError::InvalidRegion(format!("{:?}", self.region())));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub sequencing: SequencePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        ScreenProfile::Balanced.resolve().search
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub sequencing: SequencePolicy,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        ScreenProfile::Balanced.resolve().preview
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub failure_policy: RouteFailurePolicy,
}

impl Default for RouteConfig {
    fn default() -> Self {
        ScreenProfile::Balanced.resolve().route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_balanced() {
        let config = ScreenConfig::default();
        assert_eq!(config.search.sequencing, SequencePolicy::LastCompletion);
        assert_eq!(config.preview.sequencing, SequencePolicy::LastCompletion);
        assert_eq!(config.route.failure_policy, RouteFailurePolicy::StayIdle);
        assert_eq!(config.home.title, "Apple Map");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profiles() {
        let original = ScreenProfile::Original.resolve();
        assert_eq!(original.route.failure_policy, RouteFailurePolicy::DisplayEmpty);

        let strict = ScreenProfile::Strict.resolve();
        assert_eq!(strict.search.sequencing, SequencePolicy::LatestRequest);
        assert_eq!(strict.preview.sequencing, SequencePolicy::LatestRequest);

        let custom = ScreenProfile::Custom(strict.clone()).resolve();
        assert_eq!(custom, strict);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ScreenConfig::from_json_str(
            r#"{
                "home": { "location": { "lat": 51.5074, "lng": -0.1278 } },
                "preview": { "sequencing": "latest_request" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.home.location, LatLng::new(51.5074, -0.1278));
        assert_eq!(config.home.latitudinal_meters, 10_000.0);
        assert_eq!(config.preview.sequencing, SequencePolicy::LatestRequest);
        assert_eq!(config.search.sequencing, SequencePolicy::LastCompletion);
        assert_eq!(config.route.failure_policy, RouteFailurePolicy::StayIdle);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_location =
            ScreenConfig::from_json_str(r#"{ "home": { "location": { "lat": 120.0, "lng": 0.0 } } }"#);
        assert!(matches!(bad_location, Err(MapError::Config(_))));

        let bad_extent = ScreenConfig::from_json_str(r#"{ "home": { "latitudinal_meters": -5.0 } }"#);
        assert!(matches!(bad_extent, Err(MapError::Config(_))));

        let bad_json = ScreenConfig::from_json_str("{ not json");
        assert!(matches!(bad_json, Err(MapError::Serialization(_))));
    }
}
