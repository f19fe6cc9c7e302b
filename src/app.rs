use crate::acquirer::LocationAcquirer;
use crate::config::TrackerConfig;
use crate::device::{LocationProvider, Position, WatchEvent, WatchId};
use crate::error::TrackingError;
use crate::geo::GeometryProvider;
use crate::place::PlaceSelection;
use crate::presentation::Presenter;
use crate::tracker::{DistanceReading, DistanceTracker};
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

const INITIALIZING_MESSAGE: &str = "Initializing location services...";
const INIT_FAILED_MESSAGE: &str =
    "Location services unavailable. Please check your device settings and try again.";
const INVALID_PLACE_MESSAGE: &str = "Please select a valid destination from the dropdown.";

/// User driven inputs of the page.
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    PlaceChanged(PlaceSelection),
    StartClicked,
    StopClicked,
    Unload,
}

/// Owns everything of one page load and reacts to its events one at a time.
pub struct ProximityApp<L, G, P>
where
    L: LocationProvider,
{
    acquirer: LocationAcquirer<L>,
    tracker: DistanceTracker<L, G, P>,
    watch_events: UnboundedReceiver<WatchEvent>,
}

impl<L, G, P> ProximityApp<L, G, P>
where
    L: LocationProvider,
    G: GeometryProvider,
    P: Presenter,
{
    pub fn new(
        provider: Rc<L>,
        geometry: G,
        presenter: P,
        config: &TrackerConfig,
    ) -> anyhow::Result<Self> {
        let (sink, watch_events) = mpsc::unbounded_channel();
        Ok(ProximityApp {
            acquirer: LocationAcquirer::new(Rc::clone(&provider), config)?,
            tracker: DistanceTracker::new(provider, geometry, presenter, config, sink),
            watch_events,
        })
    }

    pub fn tracker(&self) -> &DistanceTracker<L, G, P> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut DistanceTracker<L, G, P> {
        &mut self.tracker
    }

    async fn acquire(&mut self) -> Result<Position, TrackingError> {
        let position = self.acquirer.acquire_initial_fix().await?;
        self.tracker.mark_location_initialized();
        Ok(position)
    }

    /// Gets the initial fix at page load.
    pub async fn initialize(&mut self) -> Result<Position, TrackingError> {
        self.tracker.presenter_mut().show_error(INITIALIZING_MESSAGE);
        match self.acquire().await {
            Ok(position) => {
                self.tracker.presenter_mut().clear_error();
                Ok(position)
            }
            Err(error) => {
                error!("[app] location services initialization failed: {}", error);
                self.tracker.presenter_mut().show_error(INIT_FAILED_MESSAGE);
                Err(error)
            }
        }
    }

    /// Starts tracking. If only the initial fix is missing, acquires it and
    /// tries to start once more.
    pub async fn start_tracking(&mut self) -> Result<WatchId, TrackingError> {
        match self.tracker.start() {
            Ok(watch_id) => {
                self.tracker.presenter_mut().clear_error();
                Ok(watch_id)
            }
            Err(TrackingError::LocationNotInitialized) => {
                let message = TrackingError::LocationNotInitialized.user_message();
                self.tracker.presenter_mut().show_error(&message);
                if let Err(error) = self.acquire().await {
                    let message = format!("Location services error: {error}");
                    self.tracker.presenter_mut().show_error(&message);
                    return Err(error);
                }
                self.tracker.presenter_mut().clear_error();
                let result = self.tracker.start();
                if let Err(error) = &result {
                    self.tracker.presenter_mut().show_error(&error.user_message());
                }
                result
            }
            Err(error) => {
                self.tracker.presenter_mut().show_error(&error.user_message());
                Err(error)
            }
        }
    }

    pub fn stop_tracking(&mut self) -> bool {
        self.tracker.stop()
    }

    pub fn on_place_changed(&mut self, selection: PlaceSelection) {
        if self.tracker.is_tracking() {
            warn!("[app] ignoring destination change while tracking");
            return;
        }
        match selection.location() {
            Some(location) => {
                self.tracker.set_destination(location);
                self.tracker.presenter_mut().clear_error();
            }
            None => self.tracker.presenter_mut().show_error(INVALID_PLACE_MESSAGE),
        }
    }

    /// Handles whatever the subscription delivered so far without waiting.
    pub fn process_pending_updates(&mut self) -> Vec<DistanceReading> {
        let mut readings = Vec::new();
        while let Ok(event) = self.watch_events.try_recv() {
            readings.extend(self.tracker.on_watch_event(event));
        }
        readings
    }

    /// The page's event loop: initial acquisition, then user events and
    /// position updates in arrival order until `Unload` (or until every
    /// event sender is gone).
    pub async fn run(&mut self, mut events: UnboundedReceiver<AppEvent>) {
        // failures are already on screen
        let _ = self.initialize().await;
        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    None | Some(AppEvent::Unload) => {
                        self.stop_tracking();
                        break;
                    }
                    Some(AppEvent::StartClicked) => {
                        let _ = self.start_tracking().await;
                    }
                    Some(AppEvent::StopClicked) => {
                        self.stop_tracking();
                    }
                    Some(AppEvent::PlaceChanged(selection)) => self.on_place_changed(selection),
                },
                Some(event) = self.watch_events.recv() => {
                    self.tracker.on_watch_event(event);
                }
            }
        }
        info!("[app] event loop finished");
    }
}
