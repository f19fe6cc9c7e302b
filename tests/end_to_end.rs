pub mod test_utils;

use proximity_core::app::{AppEvent, ProximityApp};
use proximity_core::config::TrackerConfig;
use proximity_core::device::{Position, ReplayLocationProvider};
use proximity_core::direction::Direction;
use proximity_core::error::TrackingError;
use proximity_core::geo::{Point, SphericalGeometry};
use proximity_core::place::PlaceSelection;
use std::rc::Rc;
use std::time::Duration;
use test_utils::*;
use tokio::sync::mpsc;

type App<G> = ProximityApp<ReplayLocationProvider, G, RecordingPresenter>;

fn app_with<G: proximity_core::geo::GeometryProvider>(
    geometry: G,
) -> (Rc<ReplayLocationProvider>, RecordingPresenter, App<G>) {
    let provider = Rc::new(ReplayLocationProvider::new());
    let presenter = RecordingPresenter::new();
    let app = ProximityApp::new(
        Rc::clone(&provider),
        geometry,
        presenter.clone(),
        &TrackerConfig::default(),
    )
    .unwrap();
    (provider, presenter, app)
}

fn destination() -> PlaceSelection {
    PlaceSelection::Resolved {
        name: "People's Square".to_string(),
        location: DESTINATION,
    }
}

#[tokio::test(start_paused = true)]
async fn initialize_shows_status_then_clears_it() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());
    provider.push_fix(Ok(Position::new(31.0, 121.0)));

    assert!(app.initialize().await.is_ok());
    assert_eq!(
        presenter.shown(),
        vec![
            Shown::Error("Initializing location services...".to_string()),
            Shown::ClearError
        ]
    );
    assert!(app.tracker().session().location_initialized());
}

#[tokio::test(start_paused = true)]
async fn initialize_failure() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());

    let result = app.initialize().await;
    assert!(matches!(
        result,
        Err(TrackingError::AcquisitionExhausted { attempts: 6, .. })
    ));
    assert_eq!(provider.requests().len(), 6);
    assert_eq!(
        presenter.status().as_deref(),
        Some("Location services unavailable. Please check your device settings and try again.")
    );
    assert!(!app.tracker().session().location_initialized());
}

#[tokio::test(start_paused = true)]
async fn start_without_destination_shows_message() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());
    assert_eq!(
        app.start_tracking().await,
        Err(TrackingError::NoDestinationSelected)
    );
    assert_eq!(
        presenter.status().as_deref(),
        Some("Please select a destination first.")
    );
    assert!(provider.active_watches().is_empty());
    // no acquisition is attempted for a start that can't succeed anyway
    assert!(provider.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deferred_start_after_acquisition() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());
    app.on_place_changed(destination());
    provider.push_fix(Ok(Position::new(31.0, 121.0)));

    let watch_id = app.start_tracking().await.unwrap();
    assert_eq!(app.tracker().session().watch_id(), Some(watch_id));
    assert_eq!(provider.active_watches().len(), 1);
    assert!(presenter
        .errors()
        .contains(&"Location services initializing... Please try again.".to_string()));
    assert_eq!(presenter.status(), None);
}

#[tokio::test(start_paused = true)]
async fn deferred_start_when_acquisition_fails() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());
    app.on_place_changed(destination());

    let result = app.start_tracking().await;
    assert!(matches!(
        result,
        Err(TrackingError::AcquisitionExhausted { .. })
    ));
    assert_eq!(
        presenter.status().as_deref(),
        Some("Location services error: Location unavailable: Timeout expired")
    );
    assert!(provider.active_watches().is_empty());

    // a later click retries the whole acquisition once more
    provider.push_fix(Ok(Position::new(31.0, 121.0)));
    assert!(app.start_tracking().await.is_ok());
    assert_eq!(provider.requests().len(), 7);
}

#[tokio::test(start_paused = true)]
async fn invalid_place_selection() {
    let (_provider, presenter, mut app) = app_with(SphericalGeometry::new());
    app.on_place_changed(PlaceSelection::NoGeometry {
        input: "somewhere".to_string(),
    });
    assert_eq!(app.tracker().destination(), None);
    assert_eq!(
        presenter.status().as_deref(),
        Some("Please select a valid destination from the dropdown.")
    );

    app.on_place_changed(destination());
    assert_eq!(app.tracker().destination(), Some(DESTINATION));
    assert_eq!(presenter.status(), None);
}

#[tokio::test(start_paused = true)]
async fn walk_towards_destination() {
    let (provider, presenter, mut app) = app_with(ScriptedGeometry::distances(&[500.4, 300.1]));
    provider.push_fix(Ok(Position::new(31.0, 121.0)));
    app.initialize().await.unwrap();
    app.on_place_changed(destination());
    app.start_tracking().await.unwrap();

    provider.emit_position(31.1, 121.2);
    provider.emit_position(31.2, 121.4);
    let readings = app.process_pending_updates();

    let displayed: Vec<i64> = readings.iter().map(|r| r.displayed).collect();
    assert_eq!(displayed, vec![500, 300]);
    let directions: Vec<Direction> = readings.iter().map(|r| r.direction).collect();
    assert_eq!(directions, vec![Direction::Neutral, Direction::Approaching]);

    let animations = presenter.distances();
    assert_eq!(animations[0].value_at(Duration::from_millis(800)), 500);
    assert_eq!(animations[1].value_at(Duration::ZERO), 500);
    assert_eq!(animations[1].value_at(Duration::from_millis(800)), 300);
}

#[tokio::test(start_paused = true)]
async fn event_loop() {
    let (provider, presenter, mut app) = app_with(SphericalGeometry::new());
    provider.push_fix(Ok(Position::new(31.0, 121.0)));
    let (events, events_rx) = mpsc::unbounded_channel();

    let driver = {
        let provider = Rc::clone(&provider);
        async move {
            let settle = || tokio::time::sleep(Duration::from_millis(10));
            events.send(AppEvent::PlaceChanged(destination())).unwrap();
            events.send(AppEvent::StartClicked).unwrap();
            settle().await;

            // 1 km and then 500 m north of the destination
            let far = Point::new(DESTINATION.latitude + 0.009, DESTINATION.longitude);
            let near = Point::new(DESTINATION.latitude + 0.0045, DESTINATION.longitude);
            assert_eq!(provider.emit_position(far.latitude, far.longitude), 1);
            settle().await;
            assert_eq!(provider.emit_position(near.latitude, near.longitude), 1);
            settle().await;

            events.send(AppEvent::StopClicked).unwrap();
            settle().await;
            assert_eq!(provider.emit_position(far.latitude, far.longitude), 0);
            events.send(AppEvent::Unload).unwrap();
        }
    };
    tokio::join!(app.run(events_rx), driver);

    assert_eq!(presenter.directions(), vec![Direction::Neutral, Direction::Approaching]);
    let targets: Vec<i64> = presenter.distances().iter().map(|a| a.target).collect();
    assert_eq!(targets.len(), 2);
    assert!((1001..=1002).contains(&targets[0]), "{targets:?}");
    assert!((500..=501).contains(&targets[1]), "{targets:?}");
    assert!(!app.tracker().is_tracking());
    assert_eq!(provider.cleared_watches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unload_while_tracking_cancels_watch() {
    let (provider, _presenter, mut app) = app_with(SphericalGeometry::new());
    provider.push_fix(Ok(Position::new(31.0, 121.0)));
    let (events, events_rx) = mpsc::unbounded_channel();
    events.send(AppEvent::PlaceChanged(destination())).unwrap();
    events.send(AppEvent::StartClicked).unwrap();
    events.send(AppEvent::Unload).unwrap();

    app.run(events_rx).await;
    assert!(!app.tracker().is_tracking());
    assert_eq!(provider.cleared_watches().len(), 1);
}
