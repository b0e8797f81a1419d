use crate::anomaly::{AnomalyInjector, AnomalyKind, AnomalyStats};
use crate::config::{ConfigError, GeneratorConfig};
use crate::event::Fleet;
use crate::pacer::{PacerStats, RatePacer};
use crate::publisher::Publisher;
use crate::synth::{Clock, EventSynthesizer, SystemClock};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct RunStats {
    /// Loop iterations, delivered or not
    pub attempted: u64,
    pub sent: u64,
    pub anomalies: AnomalyStats,
    /// Anomaly windows observed opening, one per satellite per window
    pub windows_opened: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub sent: u64,
    pub attempted: u64,
    /// Configured duration
    pub duration_s: u64,
    /// Wall time actually spent, at least `duration_s`
    pub elapsed: Duration,
    pub anomalies: AnomalyStats,
}

impl RunSummary {
    /// Delivered events per configured second.
    pub fn average_rate(&self) -> f64 {
        if self.duration_s == 0 {
            return 0.0;
        }
        self.sent as f64 / self.duration_s as f64
    }
}

impl core::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "sent {} events in {}s (~{:.1} eps)",
            self.sent,
            self.duration_s,
            self.average_rate()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("run already completed")]
    AlreadyCompleted,
}

/// Drives one run: pick a satellite, synthesize, publish, pace, until the
/// configured duration has elapsed.
///
/// Single task, one request in flight. The duration is only checked between
/// iterations, so a run can overshoot by up to one publish timeout plus one
/// pacing period.
pub struct RunController<P, C = SystemClock> {
    config: GeneratorConfig,
    fleet: Fleet,
    synthesizer: EventSynthesizer,
    pacer: RatePacer,
    publisher: P,
    clock: C,
    state: RunState,
    stats: RunStats,
    /// Last classification seen per satellite, indexed by ordinal - 1
    window_states: Vec<AnomalyKind>,
}

impl<P: Publisher> RunController<P> {
    pub fn new(config: GeneratorConfig, publisher: P) -> Result<Self, ConfigError> {
        Self::with_clock(config, publisher, SystemClock)
    }
}

impl<P: Publisher, C: Clock> RunController<P, C> {
    pub fn with_clock(config: GeneratorConfig, publisher: P, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let injector = AnomalyInjector::new();
        let synthesizer = match config.seed {
            Some(seed) => EventSynthesizer::with_seed(injector, seed),
            None => EventSynthesizer::new(injector),
        };

        let fleet = Fleet::new(config.sats);
        Ok(Self {
            window_states: vec![AnomalyKind::None; fleet.len()],
            fleet,
            pacer: RatePacer::new(config.qps)?,
            synthesizer,
            publisher,
            clock,
            state: RunState::Idle,
            stats: RunStats::default(),
            config,
        })
    }

    pub async fn run(&mut self) -> Result<RunSummary, ControllerError> {
        if self.state != RunState::Idle {
            return Err(ControllerError::AlreadyCompleted);
        }

        info!(
            endpoint = %self.config.endpoint_url(),
            qps = self.config.qps,
            seconds = self.config.seconds,
            sats = self.config.sats,
            "starting telemetry run"
        );
        self.log_anomaly_schedule();

        self.state = RunState::Running;
        let duration = self.config.run_duration();
        let start = Instant::now();

        while start.elapsed() < duration {
            let elapsed_seconds = start.elapsed().as_secs();
            let Some(satellite) = self.synthesizer.pick_satellite(&self.fleet) else {
                break;
            };

            let (event, kind) =
                self.synthesizer
                    .synthesize_classified(satellite, elapsed_seconds, &self.clock);
            self.stats.attempted += 1;
            self.stats.anomalies.record(kind);

            // Windows are only observed when their satellite is picked
            if let Some(previous) = self.window_states.get_mut(satellite.ordinal() as usize - 1) {
                if *previous != kind {
                    if kind == AnomalyKind::None {
                        debug!(satellite = %satellite, kind = ?*previous, elapsed_seconds, "anomaly window closed");
                    } else {
                        self.stats.windows_opened += 1;
                        debug!(satellite = %satellite, ?kind, elapsed_seconds, "anomaly window opened");
                    }
                    *previous = kind;
                }
            }

            // Transport failures only lower the sent count
            if self.publisher.publish(&event).await.is_ok() {
                self.stats.sent += 1;
            }

            self.pacer.pace().await;
        }

        self.state = RunState::Completed;
        let summary = RunSummary {
            sent: self.stats.sent,
            attempted: self.stats.attempted,
            duration_s: self.config.seconds,
            elapsed: start.elapsed(),
            anomalies: self.stats.anomalies,
        };

        info!(
            sent = summary.sent,
            attempted = summary.attempted,
            anomalous = summary.anomalies.total(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "telemetry run completed"
        );

        Ok(summary)
    }

    fn log_anomaly_schedule(&self) {
        let injector = self.synthesizer.injector();
        for satellite in self.fleet.satellites() {
            if let Some(first_window_s) = injector.next_window(satellite, 0) {
                let kind = injector.classify(satellite, first_window_s);
                debug!(satellite = %satellite, ?kind, first_window_s, "anomaly schedule");
            }
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn pacer_stats(&self) -> &PacerStats {
        self.pacer.stats()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }
}
