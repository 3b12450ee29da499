use crate::core::camera::CameraPosition;
use crate::core::config::ScreenConfig;
use crate::core::geo::Region;
use crate::screen::tokens::RequestTokens;
use crate::service::{Place, PreviewHandle, Route};

/// Route lifecycle of the screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteState {
    #[default]
    Idle,
    /// A route towards `destination` is on screen. `route` is `None` only when
    /// a failed calculation is displayed under `RouteFailurePolicy::DisplayEmpty`.
    Displaying {
        route: Option<Route>,
        destination: Place,
    },
}

impl RouteState {
    pub fn is_displaying(&self) -> bool {
        matches!(self, Self::Displaying { .. })
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Displaying { route, .. } => route.as_ref(),
            Self::Idle => None,
        }
    }

    pub fn destination(&self) -> Option<&Place> {
        match self {
            Self::Displaying { destination, .. } => Some(destination),
            Self::Idle => None,
        }
    }
}

/// Non-blocking indication that the last route request produced nothing
#[derive(Debug, Clone, PartialEq)]
pub enum RouteNotice {
    Unavailable { destination: Place },
}

/// Everything the map screen shows, owned and mutated by the controller only
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub camera_position: CameraPosition,
    /// Empty means no active search
    pub search_query: String,
    pub search_active: bool,
    pub search_results: Vec<Place>,
    pub selected_place: Option<Place>,
    pub detail_panel_visible: bool,
    pub preview_scene: Option<PreviewHandle>,
    /// Last region reported by the map surface, used to bias searches
    pub viewing_region: Option<Region>,
    pub route_state: RouteState,
    pub route_notice: Option<RouteNotice>,
    pub(crate) tokens: RequestTokens,
}

impl ViewState {
    /// Screen state at mount: home region, idle route, nothing selected
    pub fn new(config: &ScreenConfig) -> Self {
        Self {
            camera_position: CameraPosition::Region(config.home.region()),
            search_query: String::new(),
            search_active: false,
            search_results: Vec::new(),
            selected_place: None,
            detail_panel_visible: false,
            preview_scene: None,
            viewing_region: None,
            route_state: RouteState::Idle,
            route_notice: None,
            tokens: RequestTokens::default(),
        }
    }

    pub fn tokens(&self) -> &RequestTokens {
        &self.tokens
    }

    /// Region searches are biased towards
    pub fn search_bias(&self, config: &ScreenConfig) -> Region {
        self.viewing_region.unwrap_or_else(|| config.home.region())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    #[test]
    fn test_initial_state() {
        let config = ScreenConfig::default();
        let state = ViewState::new(&config);

        assert_eq!(state.camera_position, CameraPosition::Region(config.home.region()));
        assert!(state.camera_position.is_valid());
        assert!(state.search_query.is_empty());
        assert!(state.search_results.is_empty());
        assert!(state.selected_place.is_none());
        assert!(!state.detail_panel_visible);
        assert_eq!(state.route_state, RouteState::Idle);
    }

    #[test]
    fn test_search_bias_falls_back_to_home() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        assert_eq!(state.search_bias(&config), config.home.region());

        let viewing = Region::new(LatLng::new(37.5, -122.2), LatLng::new(0.1, 0.1));
        state.viewing_region = Some(viewing);
        assert_eq!(state.search_bias(&config), viewing);
    }

    #[test]
    fn test_route_state_accessors() {
        let destination = Place::new("Cafe", LatLng::new(37.3, -122.0));
        let state = RouteState::Displaying {
            route: None,
            destination: destination.clone(),
        };
        assert!(state.is_displaying());
        assert!(state.route().is_none());
        assert_eq!(state.destination(), Some(&destination));
        assert!(RouteState::Idle.destination().is_none());
    }
}
