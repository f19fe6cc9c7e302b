use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Runtime knobs for acquisition, tracking and display. The defaults are
/// the values the page historically shipped with.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Number of high-accuracy attempts before falling back.
    pub max_retries: u32,
    /// Fixed delay between two high-accuracy attempts.
    pub retry_delay: Duration,
    /// Per-attempt timeout of a high-accuracy request. The fallback
    /// request uses twice this value.
    pub location_timeout: Duration,
    /// How old a cached fix the fallback request may accept.
    pub fallback_max_age: Duration,
    /// Timeout handed to the continuous subscription.
    pub watch_timeout: Duration,
    pub animation_duration: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_retries: 5,
            retry_delay: Duration::from_millis(2000),
            location_timeout: Duration::from_millis(10000),
            fallback_max_age: Duration::from_millis(30000),
            watch_timeout: Duration::from_millis(5000),
            animation_duration: Duration::from_millis(800),
        }
    }
}

// On-disk layout. Sections we don't know about (e.g. the maps api key) are
// ignored.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    location: LocationSection,
    display: DisplaySection,
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LocationSection {
    max_retries: u32,
    retry_delay: u64,
    timeout: u64,
    fallback_max_age: u64,
    watch_timeout: u64,
}

impl Default for LocationSection {
    fn default() -> Self {
        let config = TrackerConfig::default();
        LocationSection {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay.as_millis() as u64,
            timeout: config.location_timeout.as_millis() as u64,
            fallback_max_age: config.fallback_max_age.as_millis() as u64,
            watch_timeout: config.watch_timeout.as_millis() as u64,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DisplaySection {
    animation_duration: u64,
}

impl Default for DisplaySection {
    fn default() -> Self {
        DisplaySection {
            animation_duration: TrackerConfig::default().animation_duration.as_millis() as u64,
        }
    }
}

impl TrackerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let config = TrackerConfig {
            max_retries: file.location.max_retries,
            retry_delay: Duration::from_millis(file.location.retry_delay),
            location_timeout: Duration::from_millis(file.location.timeout),
            fallback_max_age: Duration::from_millis(file.location.fallback_max_age),
            watch_timeout: Duration::from_millis(file.location.watch_timeout),
            animation_duration: Duration::from_millis(file.display.animation_duration),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            bail!("`maxRetries` must be at least 1");
        }
        Ok(())
    }

    /// Timeout of the reduced-accuracy request.
    pub fn fallback_timeout(&self) -> Duration {
        self.location_timeout * 2
    }
}
