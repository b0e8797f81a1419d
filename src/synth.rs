use crate::anomaly::{AnomalyInjector, AnomalyKind};
use crate::event::{Fleet, SatelliteId, TelemetryEvent};
use core::ops::Range;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

// Nominal sampling ranges
const NOMINAL_LATENCY_MS: Range<f64> = 20.0..80.0;
const NOMINAL_LINK_QUALITY: Range<f64> = 0.85..0.99;
const MIN_SENT_PACKETS: u32 = 80;
const MAX_SENT_PACKETS: u32 = 200;
const NOMINAL_DROP_DIVISOR: u32 = 200;

// Ranges used inside an anomaly window
const SPIKE_LATENCY_MS: Range<f64> = 300.0..800.0;
const DEGRADED_LINK_QUALITY: Range<f64> = 0.20..0.60;
const BURST_DROP_MIN_DIVISOR: u32 = 5;
const BURST_DROP_MAX_DIVISOR: u32 = 2;

/// Source of wall-clock timestamps for synthesized events.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Builds complete telemetry events, widening metric ranges whenever the
/// anomaly injector reports an active window.
#[derive(Debug)]
pub struct EventSynthesizer {
    injector: AnomalyInjector,
    rng: StdRng,
}

impl EventSynthesizer {
    pub fn new(injector: AnomalyInjector) -> Self {
        Self {
            injector,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible metric values and satellite choice. Event ids still come
    /// from a v4 UUID so they stay unique across runs.
    pub fn with_seed(injector: AnomalyInjector, seed: u64) -> Self {
        Self {
            injector,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn injector(&self) -> &AnomalyInjector {
        &self.injector
    }

    /// Uniform choice over the fleet. `None` only for an empty fleet.
    pub fn pick_satellite<'a>(&mut self, fleet: &'a Fleet) -> Option<&'a SatelliteId> {
        fleet.satellites().choose(&mut self.rng)
    }

    pub fn synthesize(
        &mut self,
        satellite: &SatelliteId,
        elapsed_seconds: u64,
        clock: &impl Clock,
    ) -> TelemetryEvent {
        self.synthesize_classified(satellite, elapsed_seconds, clock).0
    }

    /// Same as [`synthesize`](Self::synthesize), also returning the anomaly
    /// classification the metric ranges were drawn under.
    pub fn synthesize_classified(
        &mut self,
        satellite: &SatelliteId,
        elapsed_seconds: u64,
        clock: &impl Clock,
    ) -> (TelemetryEvent, AnomalyKind) {
        let kind = self.injector.classify(satellite, elapsed_seconds);

        let latency_range = match kind {
            AnomalyKind::LatencySpike => SPIKE_LATENCY_MS,
            _ => NOMINAL_LATENCY_MS,
        };
        let latency_ms = self.rng.gen_range(latency_range);

        // sent_packets first: both dropped ranges derive from it, which keeps
        // dropped_packets <= sent_packets without clamping
        let sent_packets = self.rng.gen_range(MIN_SENT_PACKETS..=MAX_SENT_PACKETS);
        let dropped_packets = match kind {
            AnomalyKind::PacketLossBurst => self.rng.gen_range(
                sent_packets / BURST_DROP_MIN_DIVISOR..=sent_packets / BURST_DROP_MAX_DIVISOR,
            ),
            _ => self
                .rng
                .gen_range(0..=(sent_packets / NOMINAL_DROP_DIVISOR).max(1)),
        };

        let quality_range = match kind {
            AnomalyKind::QualityDegradation => DEGRADED_LINK_QUALITY,
            _ => NOMINAL_LINK_QUALITY,
        };
        let link_quality = self.rng.gen_range(quality_range);

        let event = TelemetryEvent {
            event_id: Uuid::new_v4(),
            satellite_id: satellite.label().to_string(),
            timestamp_ms: clock.now_ms(),
            latency_ms,
            dropped_packets,
            sent_packets,
            link_quality,
        };

        (event, kind)
    }
}
