use crate::geo::Point;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

pub mod replay;
pub use replay::ReplayLocationProvider;

/// A single fix reported by the device.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub point: Point,
    pub accuracy: Option<f64>,
    pub timestamp_ms: Option<i64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            point: Point::new(latitude, longitude),
            accuracy: None,
            timestamp_ms: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the device may answer with. Zero means a fresh fix.
    pub maximum_age: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DeviceErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
    Unknown = 0,
}

impl From<u16> for DeviceErrorCode {
    fn from(code: u16) -> Self {
        match code {
            1 => DeviceErrorCode::PermissionDenied,
            2 => DeviceErrorCode::PositionUnavailable,
            3 => DeviceErrorCode::Timeout,
            _ => DeviceErrorCode::Unknown,
        }
    }
}

impl DeviceErrorCode {
    pub fn to_int(&self) -> u16 {
        *self as u16
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            DeviceErrorCode::PermissionDenied => {
                "Location permission denied. Please enable location services."
            }
            DeviceErrorCode::PositionUnavailable => "Location information unavailable.",
            DeviceErrorCode::Timeout => "Location request timed out.",
            DeviceErrorCode::Unknown => "An error occurred while getting your location.",
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
#[error("{message} (code {})", .code.to_int())]
pub struct DeviceError {
    pub code: DeviceErrorCode,
    pub message: String,
}

impl DeviceError {
    pub fn new(code: DeviceErrorCode, message: impl Into<String>) -> Self {
        DeviceError {
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(pub u64);

/// One delivery on a live subscription.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchEvent {
    pub watch_id: WatchId,
    pub result: Result<Position, DeviceError>,
}

/// The device's location capability: a one-shot request and a cancellable
/// subscription. Subscriptions deliver into the given channel in the order
/// the platform emits them.
pub trait LocationProvider {
    fn is_supported(&self) -> bool;

    fn get_current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Position, DeviceError>>;

    fn watch_position(&self, options: PositionOptions, sink: UnboundedSender<WatchEvent>) -> WatchId;

    fn clear_watch(&self, watch_id: WatchId);
}
