//! State transitions of the map screen
//!
//! Every transition is a function of the configuration, the current state and
//! one event. Service calls are never made here; they are returned as
//! [`Effect`]s for the controller to run.

use crate::core::camera::CameraPosition;
use crate::core::config::{RouteFailurePolicy, ScreenConfig, SequencePolicy};
use crate::screen::event::{Effect, ScreenEvent};
use crate::screen::state::{RouteNotice, RouteState, ViewState};
use crate::screen::tokens::{RequestKind, RequestToken};
use crate::service::{Place, Route};
use log::debug;

/// Pure transition: the next state and the effects it requests
pub fn reduce(
    config: &ScreenConfig,
    state: &ViewState,
    event: ScreenEvent,
) -> (ViewState, Vec<Effect>) {
    let mut next = state.clone();
    let effects = next.apply(config, event);
    (next, effects)
}

impl ViewState {
    /// Applies `event` in place and returns the requested effects
    pub fn apply(&mut self, config: &ScreenConfig, event: ScreenEvent) -> Vec<Effect> {
        let panel_was_visible = self.detail_panel_visible;
        let mut effects = Vec::new();

        match event {
            ScreenEvent::ViewportChanged(region) => {
                self.viewing_region = Some(region);
            }
            ScreenEvent::QueryChanged(query) => {
                self.search_query = query;
            }
            ScreenEvent::SearchActiveChanged(true) => {
                self.search_active = true;
            }
            ScreenEvent::SearchActiveChanged(false) => {
                self.search_active = false;
                self.search_results.clear();
                self.detail_panel_visible = false;
                self.route_notice = None;
                self.tokens.invalidate(RequestKind::Search);
                self.reset_camera(config, &mut effects);
            }
            ScreenEvent::SearchSubmitted => self.submit_search(config, &mut effects),
            ScreenEvent::SearchCompleted { token, result } => {
                if self.accepts(RequestKind::Search, token, config.search.sequencing) {
                    self.search_results = result.unwrap_or_else(|err| {
                        debug!("Search failed, showing no results: {err}");
                        Vec::new()
                    });
                } else {
                    debug!("Discarding stale search result {}", token.value());
                }
            }
            ScreenEvent::PlaceSelected(place) => self.select_place(place, &mut effects),
            ScreenEvent::DetailsClosed => {
                self.detail_panel_visible = false;
                self.select_place(None, &mut effects);
            }
            ScreenEvent::PreviewLoaded { token, result } => {
                if self.accepts(RequestKind::Preview, token, config.preview.sequencing) {
                    self.preview_scene = result.unwrap_or_else(|err| {
                        debug!("Look-around preview failed: {err}");
                        None
                    });
                } else {
                    debug!("Discarding stale preview {}", token.value());
                }
            }
            ScreenEvent::RouteRequested => self.request_route(config, &mut effects),
            ScreenEvent::RouteCalculated {
                token,
                destination,
                result,
            } => {
                // A superseded route is never shown, whatever the policy
                if !self.tokens.is_latest(RequestKind::Route, token) {
                    debug!("Discarding stale route {}", token.value());
                } else {
                    let route = result.unwrap_or_else(|err| {
                        debug!("Route calculation failed: {err}");
                        None
                    });
                    self.route_calculated(config, route, destination);
                }
            }
            ScreenEvent::DetailPanelDismissed => {
                if let RouteState::Displaying {
                    route: Some(route), ..
                } = &self.route_state
                {
                    let camera = CameraPosition::Rect(route.bounds.clone());
                    self.camera_position = camera.clone();
                    effects.push(Effect::AnimateCamera(camera));
                }
            }
            ScreenEvent::RouteEnded => self.end_route(config, &mut effects),
        }

        if panel_was_visible && !self.detail_panel_visible {
            effects.push(Effect::DismissDetailPanel);
        }
        effects
    }

    fn accepts(&self, kind: RequestKind, token: RequestToken, policy: SequencePolicy) -> bool {
        match policy {
            SequencePolicy::LastCompletion => true,
            SequencePolicy::LatestRequest => self.tokens.is_latest(kind, token),
        }
    }

    fn reset_camera(&mut self, config: &ScreenConfig, effects: &mut Vec<Effect>) {
        let home = CameraPosition::Region(config.home.region());
        self.camera_position = home.clone();
        effects.push(Effect::AnimateCamera(home));
    }

    fn submit_search(&mut self, config: &ScreenConfig, effects: &mut Vec<Effect>) {
        if self.search_query.is_empty() {
            return;
        }
        let token = self.tokens.issue(RequestKind::Search);
        debug!("Searching for {:?} (request {})", self.search_query, token.value());
        effects.push(Effect::Search {
            token,
            query: self.search_query.clone(),
            bias_region: self.search_bias(config),
        });
    }

    fn select_place(&mut self, place: Option<Place>, effects: &mut Vec<Effect>) {
        let changed = self.selected_place != place;
        self.selected_place = place;
        self.detail_panel_visible = self.selected_place.is_some();

        if !changed {
            return;
        }
        self.route_notice = None;
        if self.selected_place.is_some() {
            self.fetch_preview(effects);
        } else {
            self.tokens.invalidate(RequestKind::Preview);
        }
    }

    fn fetch_preview(&mut self, effects: &mut Vec<Effect>) {
        let Some(place) = self.selected_place.clone() else {
            return;
        };
        // Cleared up front so a stale preview is never shown
        self.preview_scene = None;
        let token = self.tokens.issue(RequestKind::Preview);
        effects.push(Effect::LookAround { token, place });
    }

    fn request_route(&mut self, config: &ScreenConfig, effects: &mut Vec<Effect>) {
        let Some(destination) = self.selected_place.clone() else {
            debug!("Route requested without a selected place");
            return;
        };
        self.route_notice = None;
        let token = self.tokens.issue(RequestKind::Route);
        effects.push(Effect::CalculateRoute {
            token,
            from: config.home.location,
            to: destination,
        });
    }

    fn route_calculated(&mut self, config: &ScreenConfig, route: Option<Route>, destination: Place) {
        match (route, config.route.failure_policy) {
            (Some(route), _) => self.display_route(Some(route), destination),
            (None, RouteFailurePolicy::DisplayEmpty) => self.display_route(None, destination),
            (None, RouteFailurePolicy::StayIdle) => {
                self.route_notice = Some(RouteNotice::Unavailable { destination });
            }
        }
    }

    fn display_route(&mut self, route: Option<Route>, destination: Place) {
        debug!(
            "Displaying route to {} ({})",
            destination.display_name(),
            if route.is_some() { "with geometry" } else { "no geometry" }
        );
        self.route_state = RouteState::Displaying { route, destination };
        self.detail_panel_visible = false;
    }

    fn end_route(&mut self, config: &ScreenConfig, effects: &mut Vec<Effect>) {
        let RouteState::Displaying { destination, .. } = std::mem::take(&mut self.route_state) else {
            return;
        };
        self.select_place(Some(destination), effects);
        self.detail_panel_visible = true;
        self.reset_camera(config, effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScreenProfile;
    use crate::core::geo::{LatLng, Region};
    use crate::service::{PreviewHandle, ServiceError};
    use std::time::Duration;

    fn place(name: &str, lat: f64, lng: f64) -> Place {
        Place::new(name, LatLng::new(lat, lng))
    }

    fn scene(id: &str) -> PreviewHandle {
        PreviewHandle {
            scene_id: id.to_string(),
            coordinate: LatLng::new(37.33, -122.01),
        }
    }

    fn route_to(destination: &Place) -> Route {
        Route::from_polyline(
            vec![LatLng::new(37.3346, -122.0090), destination.coordinate],
            3_000.0,
            Duration::from_secs(300),
        )
        .unwrap()
    }

    fn home(config: &ScreenConfig) -> CameraPosition {
        CameraPosition::Region(config.home.region())
    }

    fn preview_token(effects: &[Effect]) -> RequestToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::LookAround { token, .. } => Some(*token),
                _ => None,
            })
            .expect("look-around effect")
    }

    fn route_token(effects: &[Effect]) -> RequestToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::CalculateRoute { token, .. } => Some(*token),
                _ => None,
            })
            .expect("route effect")
    }

    fn search_token(effects: &[Effect]) -> RequestToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Search { token, .. } => Some(*token),
                _ => None,
            })
            .expect("search effect")
    }

    /// Selected `destination` with a route on screen
    fn displaying(config: &ScreenConfig, destination: &Place) -> ViewState {
        let mut state = ViewState::new(config);
        state.apply(config, ScreenEvent::PlaceSelected(Some(destination.clone())));
        let effects = state.apply(config, ScreenEvent::RouteRequested);
        state.apply(
            config,
            ScreenEvent::RouteCalculated {
                token: route_token(&effects),
                destination: destination.clone(),
                result: Ok(Some(route_to(destination))),
            },
        );
        state
    }

    #[test]
    fn test_viewport_change_sets_bias_region() {
        let config = ScreenConfig::default();
        let state = ViewState::new(&config);
        let region = Region::new(LatLng::new(37.5, -122.3), LatLng::new(0.05, 0.05));

        let (next, effects) = reduce(&config, &state, ScreenEvent::ViewportChanged(region));
        assert_eq!(next.viewing_region, Some(region));
        assert!(effects.is_empty());

        let (next, effects) = reduce(&config, &next, ScreenEvent::QueryChanged("Pizza".into()));
        let (_, effects_after) = reduce(&config, &next, ScreenEvent::SearchSubmitted);
        assert!(effects.is_empty());
        assert!(matches!(
            &effects_after[..],
            [Effect::Search { bias_region, query, .. }] if *bias_region == region && query == "Pizza"
        ));
    }

    #[test]
    fn test_empty_query_submits_nothing() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.search_results = vec![place("Old", 37.3, -122.0)];

        let (next, effects) = reduce(&config, &state, ScreenEvent::SearchSubmitted);
        assert!(effects.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_search_results_replace_and_keep_selection() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let selected = place("Selected", 37.31, -122.02);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(selected.clone())));
        state.apply(&config, ScreenEvent::QueryChanged("Coffee".into()));

        let effects = state.apply(&config, ScreenEvent::SearchSubmitted);
        assert!(matches!(
            &effects[..],
            [Effect::Search { bias_region, .. }] if *bias_region == config.home.region()
        ));

        let results = vec![
            place("Coffee A", 37.32, -122.03),
            place("Coffee B", 37.33, -122.04),
            place("Coffee C", 37.34, -122.05),
        ];
        state.apply(
            &config,
            ScreenEvent::SearchCompleted {
                token: search_token(&effects),
                result: Ok(results.clone()),
            },
        );
        assert_eq!(state.search_results, results);
        assert_eq!(state.selected_place, Some(selected));
    }

    #[test]
    fn test_search_failure_yields_empty_results() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.search_results = vec![place("Old", 37.3, -122.0)];
        state.apply(&config, ScreenEvent::QueryChanged("Coffee".into()));
        let effects = state.apply(&config, ScreenEvent::SearchSubmitted);

        state.apply(
            &config,
            ScreenEvent::SearchCompleted {
                token: search_token(&effects),
                result: Err(ServiceError::Network("offline".into())),
            },
        );
        assert!(state.search_results.is_empty());
    }

    #[test]
    fn test_overlapping_searches_by_policy() {
        let early = vec![place("Early", 37.30, -122.0)];
        let late = vec![place("Late", 37.31, -122.0)];

        for (profile, expected) in [
            (ScreenProfile::Balanced, &early),
            (ScreenProfile::Strict, &late),
        ] {
            let config = profile.resolve();
            let mut state = ViewState::new(&config);
            state.apply(&config, ScreenEvent::QueryChanged("Ea".into()));
            let first = search_token(&state.apply(&config, ScreenEvent::SearchSubmitted));
            state.apply(&config, ScreenEvent::QueryChanged("La".into()));
            let second = search_token(&state.apply(&config, ScreenEvent::SearchSubmitted));

            // The second request completes first
            state.apply(
                &config,
                ScreenEvent::SearchCompleted {
                    token: second,
                    result: Ok(late.clone()),
                },
            );
            state.apply(
                &config,
                ScreenEvent::SearchCompleted {
                    token: first,
                    result: Ok(early.clone()),
                },
            );
            assert_eq!(&state.search_results, expected, "{profile:?}");
        }
    }

    #[test]
    fn test_dismissing_search_resets_screen() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(&config, ScreenEvent::SearchActiveChanged(true));
        state.search_results = vec![place("A", 37.3, -122.0), place("B", 37.4, -122.1)];
        state.apply(&config, ScreenEvent::PlaceSelected(Some(place("A", 37.3, -122.0))));
        state.camera_position = CameraPosition::Region(Region::new(
            LatLng::new(40.0, -74.0),
            LatLng::new(1.0, 1.0),
        ));

        let effects = state.apply(&config, ScreenEvent::SearchActiveChanged(false));
        assert!(state.search_results.is_empty());
        assert!(!state.detail_panel_visible);
        assert!(!state.search_active);
        assert_eq!(state.camera_position, home(&config));
        assert_eq!(
            effects,
            vec![Effect::AnimateCamera(home(&config)), Effect::DismissDetailPanel]
        );

        // Dismissing from an untouched screen still resets
        let fresh = ViewState::new(&config);
        let (next, _) = reduce(&config, &fresh, ScreenEvent::SearchActiveChanged(false));
        assert!(next.search_results.is_empty());
        assert_eq!(next.camera_position, home(&config));
    }

    #[test]
    fn test_stale_search_after_dismissal_under_strict_policy() {
        let config = ScreenProfile::Strict.resolve();
        let mut state = ViewState::new(&config);
        state.apply(&config, ScreenEvent::QueryChanged("Coffee".into()));
        let token = search_token(&state.apply(&config, ScreenEvent::SearchSubmitted));
        state.apply(&config, ScreenEvent::SearchActiveChanged(false));

        state.apply(
            &config,
            ScreenEvent::SearchCompleted {
                token,
                result: Ok(vec![place("Coffee", 37.3, -122.0)]),
            },
        );
        assert!(state.search_results.is_empty());
    }

    #[test]
    fn test_select_place_shows_panel_and_fetches_preview() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.preview_scene = Some(scene("stale"));
        let cafe = place("Cafe", 37.32, -122.03);

        let effects = state.apply(&config, ScreenEvent::PlaceSelected(Some(cafe.clone())));
        assert_eq!(state.selected_place, Some(cafe.clone()));
        assert!(state.detail_panel_visible);
        assert!(state.preview_scene.is_none());
        assert!(matches!(&effects[..], [Effect::LookAround { place, .. }] if *place == cafe));

        state.apply(
            &config,
            ScreenEvent::PreviewLoaded {
                token: preview_token(&effects),
                result: Ok(Some(scene("cafe"))),
            },
        );
        assert_eq!(state.preview_scene, Some(scene("cafe")));
    }

    #[test]
    fn test_deselect_hides_panel_without_fetch() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let effects = state.apply(&config, ScreenEvent::PlaceSelected(Some(place("Cafe", 37.3, -122.0))));
        state.apply(
            &config,
            ScreenEvent::PreviewLoaded {
                token: preview_token(&effects),
                result: Ok(Some(scene("cafe"))),
            },
        );

        let effects = state.apply(&config, ScreenEvent::PlaceSelected(None));
        assert!(state.selected_place.is_none());
        assert!(!state.detail_panel_visible);
        assert_eq!(effects, vec![Effect::DismissDetailPanel]);
        // Nothing to fetch, the old preview is left alone
        assert_eq!(state.preview_scene, Some(scene("cafe")));
    }

    #[test]
    fn test_close_details_clears_selection() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(place("Cafe", 37.3, -122.0))));

        let effects = state.apply(&config, ScreenEvent::DetailsClosed);
        assert!(state.selected_place.is_none());
        assert!(!state.detail_panel_visible);
        assert_eq!(effects, vec![Effect::DismissDetailPanel]);
    }

    #[test]
    fn test_preview_failure_leaves_preview_absent() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let effects = state.apply(&config, ScreenEvent::PlaceSelected(Some(place("Cafe", 37.3, -122.0))));

        state.apply(
            &config,
            ScreenEvent::PreviewLoaded {
                token: preview_token(&effects),
                result: Err(ServiceError::Unavailable("imagery".into())),
            },
        );
        assert!(state.preview_scene.is_none());
    }

    /// Selects `p` then `q`, then delivers the previews in the given order
    fn race_previews(config: &ScreenConfig, p_resolves_last: bool) -> ViewState {
        let mut state = ViewState::new(config);
        let p = place("P", 37.30, -122.00);
        let q = place("Q", 37.31, -122.01);
        let p_token = preview_token(&state.apply(config, ScreenEvent::PlaceSelected(Some(p))));
        let q_token = preview_token(&state.apply(config, ScreenEvent::PlaceSelected(Some(q))));

        let p_loaded = ScreenEvent::PreviewLoaded {
            token: p_token,
            result: Ok(Some(scene("p"))),
        };
        let q_loaded = ScreenEvent::PreviewLoaded {
            token: q_token,
            result: Ok(Some(scene("q"))),
        };
        let order = if p_resolves_last {
            [q_loaded, p_loaded]
        } else {
            [p_loaded, q_loaded]
        };
        for event in order {
            state.apply(config, event);
        }
        state
    }

    #[test]
    fn test_preview_race_last_completion_wins() {
        let config = ScreenConfig::default();
        assert_eq!(race_previews(&config, true).preview_scene, Some(scene("p")));
        assert_eq!(race_previews(&config, false).preview_scene, Some(scene("q")));
    }

    #[test]
    fn test_preview_race_latest_request_wins() {
        let config = ScreenProfile::Strict.resolve();
        assert_eq!(race_previews(&config, true).preview_scene, Some(scene("q")));
        assert_eq!(race_previews(&config, false).preview_scene, Some(scene("q")));
    }

    #[test]
    fn test_route_request_requires_selection() {
        let config = ScreenConfig::default();
        let state = ViewState::new(&config);
        let (next, effects) = reduce(&config, &state, ScreenEvent::RouteRequested);
        assert!(effects.is_empty());
        assert_eq!(next, state);
    }

    #[test]
    fn test_route_success_displays_route() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let p = place("P", 37.32, -122.03);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(p.clone())));

        let effects = state.apply(&config, ScreenEvent::RouteRequested);
        assert!(matches!(
            &effects[..],
            [Effect::CalculateRoute { from, to, .. }] if *from == config.home.location && *to == p
        ));

        let r = route_to(&p);
        let effects = state.apply(
            &config,
            ScreenEvent::RouteCalculated {
                token: route_token(&effects),
                destination: p.clone(),
                result: Ok(Some(r.clone())),
            },
        );
        assert_eq!(
            state.route_state,
            RouteState::Displaying {
                route: Some(r.clone()),
                destination: p.clone()
            }
        );
        assert!(!state.detail_panel_visible);
        assert_eq!(effects, vec![Effect::DismissDetailPanel]);

        // Once the panel is gone the camera fits the route
        let effects = state.apply(&config, ScreenEvent::DetailPanelDismissed);
        assert_eq!(state.camera_position, CameraPosition::Rect(r.bounds.clone()));
        assert_eq!(effects, vec![Effect::AnimateCamera(CameraPosition::Rect(r.bounds))]);
    }

    #[test]
    fn test_route_failure_stays_idle_by_default() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let p = place("P", 37.32, -122.03);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(p.clone())));
        let token = route_token(&state.apply(&config, ScreenEvent::RouteRequested));

        let effects = state.apply(
            &config,
            ScreenEvent::RouteCalculated {
                token,
                destination: p.clone(),
                result: Err(ServiceError::Network("timeout".into())),
            },
        );
        assert_eq!(state.route_state, RouteState::Idle);
        assert!(state.detail_panel_visible);
        assert_eq!(state.route_notice, Some(RouteNotice::Unavailable { destination: p }));
        assert!(effects.is_empty());

        // Asking again clears the notice
        state.apply(&config, ScreenEvent::RouteRequested);
        assert!(state.route_notice.is_none());
    }

    #[test]
    fn test_route_failure_displays_empty_under_original_profile() {
        let config = ScreenProfile::Original.resolve();
        let mut state = ViewState::new(&config);
        let p = place("P", 37.32, -122.03);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(p.clone())));
        let token = route_token(&state.apply(&config, ScreenEvent::RouteRequested));

        state.apply(
            &config,
            ScreenEvent::RouteCalculated {
                token,
                destination: p.clone(),
                result: Ok(None),
            },
        );
        assert_eq!(
            state.route_state,
            RouteState::Displaying {
                route: None,
                destination: p
            }
        );
        assert!(!state.detail_panel_visible);

        // No geometry, nothing to fit
        let before = state.camera_position.clone();
        let effects = state.apply(&config, ScreenEvent::DetailPanelDismissed);
        assert!(effects.is_empty());
        assert_eq!(state.camera_position, before);
    }

    #[test]
    fn test_superseded_route_is_discarded() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        let p = place("P", 37.32, -122.03);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(p.clone())));
        let first = route_token(&state.apply(&config, ScreenEvent::RouteRequested));
        let _second = route_token(&state.apply(&config, ScreenEvent::RouteRequested));

        state.apply(
            &config,
            ScreenEvent::RouteCalculated {
                token: first,
                destination: p.clone(),
                result: Ok(Some(route_to(&p))),
            },
        );
        assert_eq!(state.route_state, RouteState::Idle);
    }

    #[test]
    fn test_end_route_restores_details() {
        let config = ScreenConfig::default();
        let p = place("P", 37.32, -122.03);
        let mut state = displaying(&config, &p);
        state.apply(&config, ScreenEvent::DetailPanelDismissed);
        assert!(matches!(state.camera_position, CameraPosition::Rect(_)));

        let effects = state.apply(&config, ScreenEvent::RouteEnded);
        assert_eq!(state.route_state, RouteState::Idle);
        assert!(state.detail_panel_visible);
        assert_eq!(state.selected_place, Some(p));
        assert_eq!(state.camera_position, home(&config));
        // Selection did not change, so no new preview request
        assert_eq!(effects, vec![Effect::AnimateCamera(home(&config))]);
    }

    #[test]
    fn test_end_route_refetches_preview_when_selection_moved() {
        let config = ScreenConfig::default();
        let p = place("P", 37.32, -122.03);
        let mut state = displaying(&config, &p);
        state.apply(&config, ScreenEvent::PlaceSelected(None));

        let effects = state.apply(&config, ScreenEvent::RouteEnded);
        assert_eq!(state.selected_place, Some(p.clone()));
        assert!(effects
            .iter()
            .any(|effect| matches!(effect, Effect::LookAround { place, .. } if *place == p)));
    }

    #[test]
    fn test_end_route_while_idle_is_noop() {
        let config = ScreenConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(&config, ScreenEvent::PlaceSelected(Some(place("P", 37.32, -122.03))));
        state.camera_position = CameraPosition::Region(Region::new(
            LatLng::new(37.0, -122.0),
            LatLng::new(0.5, 0.5),
        ));

        let (next, effects) = reduce(&config, &state, ScreenEvent::RouteEnded);
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }
}
