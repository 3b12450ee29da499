//! Prelude module for common mapscreen types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapscreen::prelude::*;`

pub use crate::core::{
    camera::CameraPosition,
    config::{
        HomeConfig, PreviewConfig, RouteConfig, RouteFailurePolicy, ScreenConfig, ScreenProfile,
        SearchConfig, SequencePolicy,
    },
    geo::{LatLng, LatLngBounds, Region},
};

pub use crate::screen::{
    controller::MapScreenController,
    event::{Effect, ScreenEvent},
    reducer::reduce,
    render::{DetailPanelFrame, MapControl, MarkerSpec, PreviewContent, ScreenFrame},
    state::{RouteNotice, RouteState, ViewState},
    tokens::{RequestKind, RequestToken},
};

pub use crate::service::{
    catalog::{CatalogEntry, CatalogMapService, CatalogOptions},
    MapService, Place, PreviewHandle, Route, ServiceError, ServiceResult,
};

pub use crate::runtime::{AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};
