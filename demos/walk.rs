use proximity_core::animation::{format_meters, NumberAnimation};
use proximity_core::app::{AppEvent, ProximityApp};
use proximity_core::config::TrackerConfig;
use proximity_core::device::{Position, ReplayLocationProvider};
use proximity_core::direction::Direction;
use proximity_core::geo::{Point, SphericalGeometry};
use proximity_core::place::PlaceSelection;
use proximity_core::presentation::{LogPresenter, Presenter};
use std::env;
use std::error::Error;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;

const DESTINATION: Point = Point {
    latitude: -33.8568,
    longitude: 151.2153,
};
const START: Point = Point {
    latitude: -33.8688,
    longitude: 151.2093,
};

struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn set_tracking_mode(&mut self, tracking: bool) {
        println!("[{}]", if tracking { "0 meters" } else { "Start Tracking" });
    }

    fn animate_distance(&mut self, animation: NumberAnimation) {
        let frames: Vec<String> = animation
            .frames(Duration::from_millis(100))
            .map(format_meters)
            .collect();
        println!("  {}", frames.join(" > "));
    }

    fn set_direction(&mut self, direction: Direction) {
        match direction.palette() {
            None => println!("  {direction}"),
            Some(palette) => println!("  {direction} ({})", palette.background),
        }
    }

    fn show_error(&mut self, message: &str) {
        println!("! {message}");
    }

    fn clear_error(&mut self) {}
}

async fn walk<P: Presenter>(config: &TrackerConfig, presenter: P) -> Result<(), Box<dyn Error>> {
    let provider = Rc::new(ReplayLocationProvider::new());
    provider.push_fix(Ok(Position::new(START.latitude, START.longitude)));
    let mut app = ProximityApp::new(
        Rc::clone(&provider),
        SphericalGeometry::new(),
        presenter,
        config,
    )?;

    let (events, events_rx) = mpsc::unbounded_channel();
    let walker = {
        let provider = Rc::clone(&provider);
        async move {
            events.send(AppEvent::PlaceChanged(PlaceSelection::Resolved {
                name: "Sydney Opera House".to_string(),
                location: DESTINATION,
            }))?;
            events.send(AppEvent::StartClicked)?;
            tokio::time::sleep(Duration::from_millis(200)).await;

            // mostly walking towards the destination, with a detour at step 6
            for step in 0..=10 {
                let mut t = step as f64 / 10.0;
                if step == 6 {
                    t = 0.4;
                }
                provider.emit_position(
                    START.latitude + (DESTINATION.latitude - START.latitude) * t,
                    START.longitude + (DESTINATION.longitude - START.longitude) * t,
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            events.send(AppEvent::StopClicked)?;
            events.send(AppEvent::Unload)?;
            Ok::<(), mpsc::error::SendError<AppEvent>>(())
        }
    };

    let ((), walked) = tokio::join!(app.run(events_rx), walker);
    walked?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    // CONFIG=path/to/config.json to override the defaults
    let config = match env::var("CONFIG") {
        Ok(path) => TrackerConfig::load(path)?,
        Err(_) => TrackerConfig::default(),
    };

    // PRESENTER=log renders through the logger instead of the terminal
    match env::var("PRESENTER").as_deref() {
        Ok("log") => walk(&config, LogPresenter::new()).await,
        _ => walk(&config, TerminalPresenter).await,
    }
}
