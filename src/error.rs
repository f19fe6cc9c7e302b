use crate::device::{DeviceError, DeviceErrorCode};
use thiserror::Error;

/// Everything that can go wrong in one acquisition, one start or one
/// tracking tick. None of these end the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("location error: {0}")]
    UnknownDeviceError(String),
    #[error("geometry library is not available")]
    GeometryUnavailable,
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("invalid distance {0}")]
    InvalidDistance(f64),
    #[error("no destination selected")]
    NoDestinationSelected,
    #[error("geolocation is not supported")]
    UnsupportedEnvironment,
    #[error("location services are not initialized")]
    LocationNotInitialized,
    #[error("Location unavailable: {}", .source.message)]
    AcquisitionExhausted { attempts: u32, source: DeviceError },
}

impl From<DeviceError> for TrackingError {
    fn from(error: DeviceError) -> Self {
        match error.code {
            DeviceErrorCode::PermissionDenied => TrackingError::PermissionDenied(error.message),
            DeviceErrorCode::Timeout => TrackingError::Timeout(error.message),
            DeviceErrorCode::PositionUnavailable => TrackingError::PositionUnavailable(error.message),
            DeviceErrorCode::Unknown => TrackingError::UnknownDeviceError(error.message),
        }
    }
}

impl TrackingError {
    /// Text for the single-line status area.
    pub fn user_message(&self) -> String {
        let message = match self {
            TrackingError::PermissionDenied(_) => DeviceErrorCode::PermissionDenied.user_message(),
            TrackingError::PositionUnavailable(_) => {
                DeviceErrorCode::PositionUnavailable.user_message()
            }
            TrackingError::Timeout(_) => DeviceErrorCode::Timeout.user_message(),
            TrackingError::UnknownDeviceError(_) => DeviceErrorCode::Unknown.user_message(),
            TrackingError::NoDestinationSelected => "Please select a destination first.",
            TrackingError::UnsupportedEnvironment => {
                "Geolocation is not supported by your browser."
            }
            TrackingError::LocationNotInitialized => {
                "Location services initializing... Please try again."
            }
            TrackingError::GeometryUnavailable
            | TrackingError::InvalidCoordinate { .. }
            | TrackingError::InvalidDistance(_) => {
                return format!("Error calculating distance: {self}");
            }
            TrackingError::AcquisitionExhausted { .. } => return self.to_string(),
        };
        message.to_string()
    }
}
