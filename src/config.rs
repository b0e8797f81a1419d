use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "http://localhost:8081";
pub const DEFAULT_QPS: f64 = 20.0;
pub const DEFAULT_RUN_SECONDS: u64 = 60;
pub const DEFAULT_SATELLITE_COUNT: u32 = 5;
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

const TELEMETRY_PATH: &str = "/telemetry";

/// Everything a run needs, passed explicitly into the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the ingestion service
    pub host: String,
    /// Upper bound on events per second
    pub qps: f64,
    /// Run duration in seconds
    pub seconds: u64,
    /// Fleet size
    pub sats: u32,
    pub publish_timeout: Duration,
    /// Fixed RNG seed for reproducible metric values
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            qps: DEFAULT_QPS,
            seconds: DEFAULT_RUN_SECONDS,
            sats: DEFAULT_SATELLITE_COUNT,
            publish_timeout: PUBLISH_TIMEOUT,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim_end_matches('/').is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        pacing_period(self.qps)?;
        if self.seconds == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.sats == 0 {
            return Err(ConfigError::EmptyFleet);
        }
        if self.publish_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// `host` with trailing slashes stripped, followed by `/telemetry`.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), TELEMETRY_PATH)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

/// Delay between iterations for a target rate: `1 / qps`.
///
/// Rejects rates that are not positive, not finite, or so small that the
/// period does not fit in a `Duration`.
pub fn pacing_period(qps: f64) -> Result<Duration, ConfigError> {
    if !qps.is_finite() || qps <= 0.0 {
        return Err(ConfigError::InvalidRate(qps));
    }
    Duration::try_from_secs_f64(1.0 / qps).map_err(|_| ConfigError::InvalidRate(qps))
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("qps must be a positive number, got {0}")]
    InvalidRate(f64),
    #[error("seconds must be positive")]
    ZeroDuration,
    #[error("sats must be positive")]
    EmptyFleet,
    #[error("publish timeout must be positive")]
    ZeroTimeout,
}
