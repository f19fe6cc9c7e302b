use crate::config::TrackerConfig;
use crate::device::{DeviceError, LocationProvider, Position, PositionOptions};
use crate::error::TrackingError;
use std::rc::Rc;
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccuracyMode {
    High,
    Reduced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub fallback_timeout: Duration,
    pub fallback_max_age: Duration,
}

impl TryFrom<&TrackerConfig> for RetryPolicy {
    type Error = anyhow::Error;

    fn try_from(config: &TrackerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(RetryPolicy {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
            timeout: config.location_timeout,
            fallback_timeout: config.fallback_timeout(),
            fallback_max_age: config.fallback_max_age,
        })
    }
}

impl RetryPolicy {
    pub fn options(&self, mode: AccuracyMode) -> PositionOptions {
        match mode {
            AccuracyMode::High => PositionOptions {
                high_accuracy: true,
                timeout: self.timeout,
                maximum_age: Duration::ZERO,
            },
            AccuracyMode::Reduced => PositionOptions {
                high_accuracy: false,
                timeout: self.fallback_timeout,
                maximum_age: self.fallback_max_age,
            },
        }
    }
}

enum AcquisitionState {
    HighAccuracyAttempt(u32),
    FallbackAttempt,
    Acquired(Position),
    Failed(DeviceError),
}

/// Gets the first trustworthy fix of a page load.
///
/// High-accuracy requests are retried with a fixed delay up to
/// `max_retries` times; if all of them fail, one last request is made with
/// reduced accuracy, a doubled timeout and a tolerance for cached fixes.
/// Every device error is retried the same way, permission denial included.
///
/// Calls are not deduplicated: the caller must not run two acquisitions at
/// once.
pub struct LocationAcquirer<L> {
    provider: Rc<L>,
    policy: RetryPolicy,
}

impl<L: LocationProvider> LocationAcquirer<L> {
    /// Fails when `config` does not allow a single high-accuracy attempt.
    pub fn new(provider: Rc<L>, config: &TrackerConfig) -> anyhow::Result<Self> {
        Ok(LocationAcquirer {
            provider,
            policy: RetryPolicy::try_from(config)?,
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn acquire_initial_fix(&self) -> Result<Position, TrackingError> {
        if !self.provider.is_supported() {
            return Err(TrackingError::UnsupportedEnvironment);
        }

        let max_retries = self.policy.max_retries;
        let mut state = AcquisitionState::HighAccuracyAttempt(0);
        loop {
            state = match state {
                AcquisitionState::HighAccuracyAttempt(retry) => {
                    let options = self.policy.options(AccuracyMode::High);
                    match self.provider.get_current_position(options).await {
                        Ok(position) => AcquisitionState::Acquired(position),
                        Err(error) => {
                            warn!(
                                "[acquirer] location init error (attempt {}/{}): {}",
                                retry + 1,
                                max_retries,
                                error
                            );
                            if retry + 1 < max_retries {
                                tokio::time::sleep(self.policy.retry_delay).await;
                                AcquisitionState::HighAccuracyAttempt(retry + 1)
                            } else {
                                info!("[acquirer] falling back to reduced accuracy");
                                AcquisitionState::FallbackAttempt
                            }
                        }
                    }
                }
                AcquisitionState::FallbackAttempt => {
                    let options = self.policy.options(AccuracyMode::Reduced);
                    match self.provider.get_current_position(options).await {
                        Ok(position) => AcquisitionState::Acquired(position),
                        Err(error) => AcquisitionState::Failed(error),
                    }
                }
                AcquisitionState::Acquired(position) => {
                    info!("[acquirer] initial fix acquired");
                    return Ok(position);
                }
                AcquisitionState::Failed(error) => {
                    error!("[acquirer] giving up: {}", error);
                    return Err(TrackingError::AcquisitionExhausted {
                        attempts: max_retries + 1,
                        source: error,
                    });
                }
            };
        }
    }
}
