#![allow(dead_code)]

use proximity_core::animation::NumberAnimation;
use proximity_core::device::{DeviceError, DeviceErrorCode};
use proximity_core::direction::Direction;
use proximity_core::error::TrackingError;
use proximity_core::geo::{GeometryProvider, Point};
use proximity_core::presentation::Presenter;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const DESTINATION: Point = Point {
    latitude: 31.2304,
    longitude: 121.4737,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Shown {
    TrackingMode(bool),
    Distance(NumberAnimation),
    Direction(Direction),
    Error(String),
    ClearError,
}

/// Remembers everything it was asked to show. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    shown: Rc<RefCell<Vec<Shown>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.borrow().clone()
    }

    pub fn distances(&self) -> Vec<NumberAnimation> {
        self.shown
            .borrow()
            .iter()
            .filter_map(|s| match s {
                Shown::Distance(animation) => Some(*animation),
                _ => None,
            })
            .collect()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.shown
            .borrow()
            .iter()
            .filter_map(|s| match s {
                Shown::Direction(direction) => Some(*direction),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.shown
            .borrow()
            .iter()
            .filter_map(|s| match s {
                Shown::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// The text currently in the status area, if any.
    pub fn status(&self) -> Option<String> {
        let mut status = None;
        for s in self.shown.borrow().iter() {
            match s {
                Shown::Error(message) => status = Some(message.clone()),
                Shown::ClearError => status = None,
                _ => (),
            }
        }
        status
    }

    pub fn clear(&self) {
        self.shown.borrow_mut().clear();
    }
}

impl Presenter for RecordingPresenter {
    fn set_tracking_mode(&mut self, tracking: bool) {
        self.shown.borrow_mut().push(Shown::TrackingMode(tracking));
    }

    fn animate_distance(&mut self, animation: NumberAnimation) {
        self.shown.borrow_mut().push(Shown::Distance(animation));
    }

    fn set_direction(&mut self, direction: Direction) {
        self.shown.borrow_mut().push(Shown::Direction(direction));
    }

    fn show_error(&mut self, message: &str) {
        self.shown
            .borrow_mut()
            .push(Shown::Error(message.to_string()));
    }

    fn clear_error(&mut self) {
        self.shown.borrow_mut().push(Shown::ClearError);
    }
}

/// Answers distance queries from a script, ignoring the coordinates.
pub struct ScriptedGeometry {
    answers: RefCell<VecDeque<Result<f64, TrackingError>>>,
}

impl ScriptedGeometry {
    pub fn new(answers: Vec<Result<f64, TrackingError>>) -> Self {
        ScriptedGeometry {
            answers: RefCell::new(answers.into()),
        }
    }

    pub fn distances(distances: &[f64]) -> Self {
        Self::new(distances.iter().map(|d| Ok(*d)).collect())
    }
}

impl GeometryProvider for ScriptedGeometry {
    fn distance_meters(&self, _a: &Point, _b: &Point) -> Result<f64, TrackingError> {
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(TrackingError::GeometryUnavailable))
    }
}

pub fn timeout_error() -> DeviceError {
    DeviceError::new(DeviceErrorCode::Timeout, "Timeout expired")
}

pub fn denied_error() -> DeviceError {
    DeviceError::new(DeviceErrorCode::PermissionDenied, "User denied Geolocation")
}
