//! Screen-wide constants.
//! Keeping them in a single place makes it easier to tweak the screen's magic numbers.

/// Default home location (latitude, longitude): Apple Park, Cupertino.
pub const HOME_LOCATION: (f64, f64) = (37.3346, -122.0090);

/// Home region extent in metres (latitudinal, longitudinal).
pub const HOME_REGION_METERS: (f64, f64) = (10_000.0, 10_000.0);

/// Navigation title shown while no route is displayed.
pub const SCREEN_TITLE: &str = "Apple Map";

/// Title used for the annotation on the home location.
pub const HOME_ANNOTATION_TITLE: &str = "Apple Park";

/// Marker title for places without a name.
pub const UNNAMED_PLACE: &str = "Place";

/// Placeholder shown in the detail panel when no preview scene is loaded.
pub const NO_PREVIEW_TEXT: &str = "No Preview Available";

/// Label of the route-ending control.
pub const END_ROUTE_LABEL: &str = "End Route";

/// Label of the directions action in the detail panel.
pub const GET_DIRECTIONS_LABEL: &str = "Get Directions";

/// Detail panel height in points.
pub const DETAIL_PANEL_HEIGHT: f32 = 300.0;

/// Preview area height inside the detail panel.
pub const PREVIEW_HEIGHT: f32 = 200.0;

/// Stroke width of the route polyline.
pub const ROUTE_LINE_WIDTH: f32 = 7.0;
