use crate::config::{pacing_period, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PacerStats {
    pub pauses: u64,
    pub total_slept: Duration,
}

/// Fixed delay of `1 / qps` after every iteration.
///
/// The delay is added on top of the work, not subtracted from it, so the
/// configured rate is an upper bound: any publish latency lowers the achieved
/// throughput below it.
#[derive(Debug)]
pub struct RatePacer {
    period: Duration,
    stats: PacerStats,
}

impl RatePacer {
    pub fn new(qps: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            period: pacing_period(qps)?,
            stats: PacerStats::default(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn pace(&mut self) {
        time::sleep(self.period).await;
        self.stats.pauses += 1;
        self.stats.total_slept += self.period;
    }

    pub fn stats(&self) -> &PacerStats {
        &self.stats
    }
}
