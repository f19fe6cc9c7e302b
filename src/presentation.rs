use crate::animation::{format_meters, NumberAnimation};
use crate::direction::Direction;

/// The rendering side. It only displays what it is told.
pub trait Presenter {
    /// Switch between the "Start Tracking" look and the live distance look.
    /// Leaving tracking mode also resets the temperature cue.
    fn set_tracking_mode(&mut self, tracking: bool);

    fn animate_distance(&mut self, animation: NumberAnimation);

    fn set_direction(&mut self, direction: Direction);

    fn show_error(&mut self, message: &str);

    fn clear_error(&mut self);
}

/// Writes everything it is asked to display to the log.
pub struct LogPresenter {
    error_shown: bool,
}

impl LogPresenter {
    pub fn new() -> Self {
        LogPresenter { error_shown: false }
    }
}

impl Presenter for LogPresenter {
    fn set_tracking_mode(&mut self, tracking: bool) {
        if tracking {
            info!("[display] 0 meters");
        } else {
            info!("[display] Start Tracking");
        }
    }

    fn animate_distance(&mut self, animation: NumberAnimation) {
        info!(
            "[display] {} -> {}",
            format_meters(animation.start),
            format_meters(animation.target)
        );
    }

    fn set_direction(&mut self, direction: Direction) {
        match direction.palette() {
            None => info!("[display] {direction}"),
            Some(palette) => info!("[display] {direction} ({})", palette.background),
        }
    }

    fn show_error(&mut self, message: &str) {
        self.error_shown = true;
        warn!("[display] {message}");
    }

    fn clear_error(&mut self) {
        if self.error_shown {
            self.error_shown = false;
            info!("[display] status cleared");
        }
    }
}
