//! Map screen controller
//!
//! Owns the [`ViewState`], applies events through the reducer and runs the
//! resulting service requests on the async runtime. Completions come back over
//! a channel and are applied on the UI thread by [`MapScreenController::pump`],
//! in arrival order. Requests are never cancelled or retried.

use crate::core::config::ScreenConfig;
use crate::core::geo::Region;
use crate::runtime::{self, AsyncHandle, AsyncSpawner};
use crate::screen::event::{Effect, ScreenEvent};
use crate::screen::render::ScreenFrame;
use crate::screen::state::ViewState;
use crate::service::{MapService, Place};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub struct MapScreenController {
    config: ScreenConfig,
    state: ViewState,
    service: Arc<dyn MapService>,
    spawner: Option<Arc<dyn AsyncSpawner>>,
    completion_tx: Sender<ScreenEvent>,
    completion_rx: Receiver<ScreenEvent>,
    in_flight: Vec<Box<dyn AsyncHandle>>,
    /// Camera animations and panel dismissals for the host to perform
    host_effects: Vec<Effect>,
    acknowledge_dismissal: bool,
}

impl MapScreenController {
    pub fn new(service: Arc<dyn MapService>, config: ScreenConfig) -> Result<Self> {
        config.validate()?;
        let (completion_tx, completion_rx) = unbounded();
        Ok(Self {
            state: ViewState::new(&config),
            config,
            service,
            spawner: None,
            completion_tx,
            completion_rx,
            in_flight: Vec::new(),
            host_effects: Vec::new(),
            acknowledge_dismissal: false,
        })
    }

    /// Runs service requests on `spawner` instead of the global runtime
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// For hosts without a panel animation: every panel dismissal is
    /// acknowledged as soon as it is requested
    pub fn acknowledge_dismissal_immediately(mut self, enabled: bool) -> Self {
        self.acknowledge_dismissal = enabled;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn frame(&self) -> ScreenFrame {
        ScreenFrame::from_state(&self.state, &self.config)
    }

    /// Number of service requests that have not completed yet
    pub fn in_flight(&mut self) -> usize {
        self.in_flight.retain(|handle| !handle.is_finished());
        self.in_flight.len()
    }

    /// Whether a completion is waiting for the next [`pump`](Self::pump)
    pub fn has_pending_completions(&self) -> bool {
        !self.completion_rx.is_empty()
    }

    /// Camera animations and panel dismissals requested since the last call
    pub fn take_host_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.host_effects)
    }

    pub fn dispatch(&mut self, event: ScreenEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in self.state.apply(&self.config, event) {
                match effect {
                    Effect::DismissDetailPanel if self.acknowledge_dismissal => {
                        queue.push_back(ScreenEvent::DetailPanelDismissed);
                    }
                    Effect::DismissDetailPanel | Effect::AnimateCamera(_) => {
                        self.host_effects.push(effect);
                    }
                    request => self.run(request),
                }
            }
        }
    }

    /// Applies every completion that has arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.completion_rx.try_recv() {
            log::trace!("Applying completion {event:?}");
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Waits until no request is in flight, applying completions as they
    /// arrive. Requests issued while applying are waited for as well.
    pub async fn settle(&mut self) {
        loop {
            self.pump();
            if self.in_flight() == 0 {
                // Finished tasks have already sent their completion
                if self.pump() == 0 {
                    break;
                }
                continue;
            }
            runtime::async_utils::async_delay(Duration::from_millis(1)).await;
        }
    }

    fn run(&mut self, effect: Effect) {
        let service = Arc::clone(&self.service);
        let tx = self.completion_tx.clone();

        let future: std::pin::Pin<Box<dyn futures::Future<Output = ()> + Send>> = match effect {
            Effect::Search {
                token,
                query,
                bias_region,
            } => Box::pin(async move {
                let result = service.search(&query, &bias_region).await;
                deliver(&tx, ScreenEvent::SearchCompleted { token, result });
            }),
            Effect::LookAround { token, place } => Box::pin(async move {
                let result = service.look_around(&place).await;
                deliver(&tx, ScreenEvent::PreviewLoaded { token, result });
            }),
            Effect::CalculateRoute { token, from, to } => Box::pin(async move {
                let result = service.calculate_route(from, &to).await;
                deliver(
                    &tx,
                    ScreenEvent::RouteCalculated {
                        token,
                        destination: to,
                        result,
                    },
                );
            }),
            Effect::AnimateCamera(_) | Effect::DismissDetailPanel => return,
        };

        let handle = match &self.spawner {
            Some(spawner) => spawner.spawn_boxed(future),
            None => runtime::runtime().spawn_boxed(future),
        };
        self.in_flight.push(handle);
    }

    pub fn on_viewport_change(&mut self, region: Region) {
        self.dispatch(ScreenEvent::ViewportChanged(region));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(ScreenEvent::QueryChanged(query.into()));
    }

    pub fn toggle_search_active(&mut self, active: bool) {
        self.dispatch(ScreenEvent::SearchActiveChanged(active));
    }

    pub fn submit_search(&mut self) {
        self.dispatch(ScreenEvent::SearchSubmitted);
    }

    pub fn select_place(&mut self, place: Option<Place>) {
        self.dispatch(ScreenEvent::PlaceSelected(place));
    }

    pub fn close_details(&mut self) {
        self.dispatch(ScreenEvent::DetailsClosed);
    }

    pub fn request_route(&mut self) {
        self.dispatch(ScreenEvent::RouteRequested);
    }

    pub fn detail_panel_dismissed(&mut self) {
        self.dispatch(ScreenEvent::DetailPanelDismissed);
    }

    pub fn end_route(&mut self) {
        self.dispatch(ScreenEvent::RouteEnded);
    }
}

/// Completions outliving their controller are dropped
fn deliver(tx: &Sender<ScreenEvent>, event: ScreenEvent) {
    if let Err(err) = tx.send(event) {
        log::trace!("Controller gone, dropping completion {:?}", err.into_inner());
    }
}
