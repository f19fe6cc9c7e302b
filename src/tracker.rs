use crate::animation::NumberAnimation;
use crate::config::TrackerConfig;
use crate::device::{LocationProvider, Position, PositionOptions, WatchEvent, WatchId};
use crate::direction::Direction;
use crate::error::TrackingError;
use crate::geo::{GeometryProvider, Point};
use crate::presentation::Presenter;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// State of one "Start Tracking" -> "Stop Tracking" cycle.
///
/// `watch_id` is `Some` exactly while tracking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingSession {
    watch_id: Option<WatchId>,
    previous_distance: Option<f64>,
    location_initialized: bool,
    // last integer handed to the display, animations start from here
    shown_distance: i64,
}

impl TrackingSession {
    pub fn watch_id(&self) -> Option<WatchId> {
        self.watch_id
    }

    pub fn is_tracking(&self) -> bool {
        self.watch_id.is_some()
    }

    pub fn previous_distance(&self) -> Option<f64> {
        self.previous_distance
    }

    pub fn location_initialized(&self) -> bool {
        self.location_initialized
    }

    pub fn shown_distance(&self) -> i64 {
        self.shown_distance
    }
}

/// What one position update produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceReading {
    pub distance: f64,
    pub displayed: i64,
    pub direction: Direction,
}

pub struct DistanceTracker<L, G, P>
where
    L: LocationProvider,
{
    provider: Rc<L>,
    geometry: G,
    presenter: P,
    watch_timeout: Duration,
    animation_duration: Duration,
    destination: Option<Point>,
    session: TrackingSession,
    sink: UnboundedSender<WatchEvent>,
}

impl<L, G, P> DistanceTracker<L, G, P>
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
        sink: UnboundedSender<WatchEvent>,
    ) -> Self {
        DistanceTracker {
            provider,
            geometry,
            presenter,
            watch_timeout: config.watch_timeout,
            animation_duration: config.animation_duration,
            destination: None,
            session: TrackingSession::default(),
            sink,
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_tracking()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn destination(&self) -> Option<Point> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Point) {
        self.destination = Some(destination);
    }

    pub fn mark_location_initialized(&mut self) {
        self.session.location_initialized = true;
    }

    /// Registers the continuous subscription. Prerequisites are checked in
    /// order: a destination, a geolocation capable environment, a successful
    /// initial fix. Nothing is registered when one of them is missing.
    pub fn start(&mut self) -> Result<WatchId, TrackingError> {
        if let Some(watch_id) = self.session.watch_id {
            debug!("[tracker] already tracking with {:?}", watch_id);
            return Ok(watch_id);
        }
        if self.destination.is_none() {
            return Err(TrackingError::NoDestinationSelected);
        }
        if !self.provider.is_supported() {
            return Err(TrackingError::UnsupportedEnvironment);
        }
        if !self.session.location_initialized {
            return Err(TrackingError::LocationNotInitialized);
        }

        let options = PositionOptions {
            high_accuracy: true,
            timeout: self.watch_timeout,
            maximum_age: Duration::ZERO,
        };
        let watch_id = self.provider.watch_position(options, self.sink.clone());
        info!("[tracker] watching position with {:?}", watch_id);
        self.session.watch_id = Some(watch_id);
        self.session.shown_distance = 0;
        self.presenter.set_tracking_mode(true);
        Ok(watch_id)
    }

    /// Cancels the subscription. Returns `false` (and does nothing) when not
    /// tracking.
    pub fn stop(&mut self) -> bool {
        match self.session.watch_id.take() {
            None => false,
            Some(watch_id) => {
                self.provider.clear_watch(watch_id);
                info!("[tracker] cleared {:?}", watch_id);
                self.session.previous_distance = None;
                self.presenter.set_tracking_mode(false);
                true
            }
        }
    }

    /// Handles one delivery from the subscription. Deliveries for a watch
    /// that is no longer live are dropped.
    pub fn on_watch_event(&mut self, event: WatchEvent) -> Option<DistanceReading> {
        if self.session.watch_id != Some(event.watch_id) {
            debug!("[tracker] dropping event of stale {:?}", event.watch_id);
            return None;
        }
        match event.result {
            Ok(position) => self.on_position(&position),
            Err(error) => {
                warn!("[tracker] watch error: {}", error);
                let error = TrackingError::from(error);
                self.presenter.show_error(&error.user_message());
                None
            }
        }
    }

    fn on_position(&mut self, position: &Position) -> Option<DistanceReading> {
        let destination = self.destination?;
        let computed = self
            .geometry
            .distance_meters(&position.point, &destination)
            .and_then(|distance| {
                if distance.is_finite() {
                    Ok(distance)
                } else {
                    Err(TrackingError::InvalidDistance(distance))
                }
            });
        let distance = match computed {
            Ok(distance) => distance,
            Err(TrackingError::GeometryUnavailable) => {
                debug!("[tracker] geometry not available, skipping update");
                return None;
            }
            Err(error) => {
                warn!("[tracker] distance computation failed: {}", error);
                self.presenter.show_error(&error.user_message());
                return None;
            }
        };

        let displayed = distance.round() as i64;
        self.presenter.animate_distance(NumberAnimation::new(
            self.session.shown_distance,
            displayed,
            self.animation_duration,
        ));
        self.session.shown_distance = displayed;

        let direction = Direction::derive(self.session.previous_distance, distance);
        self.presenter.set_direction(direction);
        self.session.previous_distance = Some(distance);
        self.presenter.clear_error();

        Some(DistanceReading {
            distance,
            displayed,
            direction,
        })
    }
}

impl<L, G, P> Drop for DistanceTracker<L, G, P>
where
    L: LocationProvider,
{
    fn drop(&mut self) {
        if let Some(watch_id) = self.session.watch_id.take() {
            self.provider.clear_watch(watch_id);
        }
    }
}
