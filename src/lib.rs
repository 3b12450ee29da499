//! # mapscreen
//!
//! Interaction logic for a single-screen map browser: search for places,
//! preview a look-around scene, and request and display a driving route.
//!
//! The screen is an explicit state machine. [`screen::reducer::reduce`] maps
//! the current [`ViewState`] and a [`ScreenEvent`] to the next state plus the
//! side-effect requests ([`Effect`]) to run. [`MapScreenController`] executes
//! those effects against a [`MapService`] and feeds the completions back in.
//! Rendering, geocoding, routing and street-level imagery stay behind the
//! service and the derived [`ScreenFrame`].

pub mod core;
pub mod prelude;
pub mod runtime;
pub mod screen;
pub mod service;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    camera::CameraPosition,
    config::{RouteFailurePolicy, ScreenConfig, ScreenProfile, SequencePolicy},
    geo::{LatLng, LatLngBounds, Region},
};

pub use crate::screen::{
    controller::MapScreenController,
    event::{Effect, ScreenEvent},
    reducer::reduce,
    render::ScreenFrame,
    state::{RouteNotice, RouteState, ViewState},
};

pub use crate::service::{
    catalog::{CatalogEntry, CatalogMapService},
    MapService, Place, PreviewHandle, Route, ServiceError,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),
}

/// Error type alias for convenience
pub type Error = MapError;
