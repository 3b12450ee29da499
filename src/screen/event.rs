use crate::core::camera::CameraPosition;
use crate::core::geo::{LatLng, Region};
use crate::screen::tokens::RequestToken;
use crate::service::{Place, PreviewHandle, Route, ServiceResult};

/// Everything that can happen to the map screen: user input from the UI and
/// completions of service requests
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// The user panned or zoomed the map
    ViewportChanged(Region),
    /// Text in the search field changed
    QueryChanged(String),
    /// The search UI was presented (`true`) or dismissed (`false`)
    SearchActiveChanged(bool),
    SearchSubmitted,
    SearchCompleted {
        token: RequestToken,
        result: ServiceResult<Vec<Place>>,
    },
    PlaceSelected(Option<Place>),
    /// Close button on the detail panel
    DetailsClosed,
    PreviewLoaded {
        token: RequestToken,
        result: ServiceResult<Option<PreviewHandle>>,
    },
    /// "Get Directions"
    RouteRequested,
    RouteCalculated {
        token: RequestToken,
        destination: Place,
        result: ServiceResult<Option<Route>>,
    },
    /// The host finished animating the detail panel away
    DetailPanelDismissed,
    /// "End Route"
    RouteEnded,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Search {
        token: RequestToken,
        query: String,
        bias_region: Region,
    },
    LookAround {
        token: RequestToken,
        place: Place,
    },
    CalculateRoute {
        token: RequestToken,
        from: LatLng,
        to: Place,
    },
    /// Animate the map to the camera already stored in the state
    AnimateCamera(CameraPosition),
    /// Animate the detail panel away, then report `DetailPanelDismissed`
    DismissDetailPanel,
}
