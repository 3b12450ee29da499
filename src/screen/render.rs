//! What the render surface draws, derived from the state and never stored

use crate::core::camera::CameraPosition;
use crate::core::config::ScreenConfig;
use crate::core::constants::{
    END_ROUTE_LABEL, GET_DIRECTIONS_LABEL, HOME_ANNOTATION_TITLE, NO_PREVIEW_TEXT,
};
use crate::core::geo::LatLng;
use crate::screen::state::{RouteNotice, RouteState, ViewState};
use crate::service::{Place, PreviewHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub title: String,
    pub coordinate: LatLng,
    /// Place selected when the marker is tapped
    pub place: Place,
}

impl MarkerSpec {
    fn for_place(place: &Place) -> Self {
        Self {
            title: place.display_name().to_string(),
            coordinate: place.coordinate,
            place: place.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub title: String,
    pub coordinate: LatLng,
}

/// Pass-through map controls, no screen logic attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapControl {
    Compass,
    PitchToggle,
    UserLocationButton,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewContent {
    Scene(PreviewHandle),
    Unavailable(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanelFrame {
    pub title: String,
    pub preview: PreviewContent,
    pub directions_label: &'static str,
    /// Shown when the last route request found nothing
    pub route_notice: Option<String>,
}

/// One frame of the map screen
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFrame {
    pub camera: CameraPosition,
    pub home_annotation: Annotation,
    pub markers: Vec<MarkerSpec>,
    pub route_polyline: Option<Vec<LatLng>>,
    pub shows_user_location: bool,
    pub navigation_bar_visible: bool,
    pub title: String,
    pub search_presented: bool,
    /// Label of the route-ending control, present while a route is displayed
    pub end_route_label: Option<&'static str>,
    pub detail_panel: Option<DetailPanelFrame>,
    pub map_controls: [MapControl; 3],
}

impl ScreenFrame {
    pub fn from_state(state: &ViewState, config: &ScreenConfig) -> Self {
        let displaying = state.route_state.is_displaying();

        // While a route is shown only the destination keeps its marker, and
        // only while it is still among the results
        let markers = state
            .search_results
            .iter()
            .filter(|place| match &state.route_state {
                RouteState::Idle => true,
                RouteState::Displaying { destination, .. } => *place == destination,
            })
            .map(MarkerSpec::for_place)
            .collect();

        Self {
            camera: state.camera_position.clone(),
            home_annotation: Annotation {
                title: HOME_ANNOTATION_TITLE.to_string(),
                coordinate: config.home.location,
            },
            markers,
            route_polyline: state.route_state.route().map(|route| route.polyline.clone()),
            shows_user_location: true,
            navigation_bar_visible: !displaying,
            title: config.home.title.clone(),
            search_presented: state.search_active && !displaying,
            end_route_label: displaying.then_some(END_ROUTE_LABEL),
            detail_panel: Self::detail_panel(state),
            map_controls: [
                MapControl::Compass,
                MapControl::PitchToggle,
                MapControl::UserLocationButton,
            ],
        }
    }

    fn detail_panel(state: &ViewState) -> Option<DetailPanelFrame> {
        if !state.detail_panel_visible {
            return None;
        }
        let place = state.selected_place.as_ref()?;
        let preview = match &state.preview_scene {
            Some(scene) => PreviewContent::Scene(scene.clone()),
            None => PreviewContent::Unavailable(NO_PREVIEW_TEXT),
        };
        let route_notice = state.route_notice.as_ref().map(|notice| match notice {
            RouteNotice::Unavailable { destination } => {
                format!("No route found to {}", destination.display_name())
            }
        });

        Some(DetailPanelFrame {
            title: place.display_name().to_string(),
            preview,
            directions_label: GET_DIRECTIONS_LABEL,
            route_notice,
        })
    }
}
