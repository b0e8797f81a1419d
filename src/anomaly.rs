use crate::event::SatelliteId;
use serde::{Deserialize, Serialize};

// Default anomaly schedule, keyed by satellite ordinal
const LATENCY_SPIKE_PERIOD_S: u64 = 30;
const PACKET_LOSS_PERIOD_S: u64 = 45;
const QUALITY_DEGRADATION_PERIOD_S: u64 = 60;
const ANOMALY_WINDOW_S: u64 = 5;

const DEFAULT_SCHEDULE: [AnomalyRule; 3] = [
    AnomalyRule {
        ordinal: 1,
        kind: AnomalyKind::LatencySpike,
        period_s: LATENCY_SPIKE_PERIOD_S,
        window_s: ANOMALY_WINDOW_S,
    },
    AnomalyRule {
        ordinal: 2,
        kind: AnomalyKind::PacketLossBurst,
        period_s: PACKET_LOSS_PERIOD_S,
        window_s: ANOMALY_WINDOW_S,
    },
    AnomalyRule {
        ordinal: 3,
        kind: AnomalyKind::QualityDegradation,
        period_s: QUALITY_DEGRADATION_PERIOD_S,
        window_s: ANOMALY_WINDOW_S,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnomalyKind {
    #[default]
    None,
    LatencySpike,
    PacketLossBurst,
    QualityDegradation,
}

/// A recurring fault window for one satellite: active while
/// `elapsed_seconds % period_s < window_s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRule {
    pub ordinal: u32,
    pub kind: AnomalyKind,
    pub period_s: u64,
    pub window_s: u64,
}

impl AnomalyRule {
    pub fn is_active(&self, elapsed_seconds: u64) -> bool {
        self.period_s > 0 && elapsed_seconds % self.period_s < self.window_s
    }
}

/// Count of emitted events per anomaly kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnomalyStats {
    pub latency_spikes: u64,
    pub packet_loss_bursts: u64,
    pub quality_degradations: u64,
}

impl AnomalyStats {
    pub fn record(&mut self, kind: AnomalyKind) {
        match kind {
            AnomalyKind::None => {}
            AnomalyKind::LatencySpike => self.latency_spikes += 1,
            AnomalyKind::PacketLossBurst => self.packet_loss_bursts += 1,
            AnomalyKind::QualityDegradation => self.quality_degradations += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.latency_spikes + self.packet_loss_bursts + self.quality_degradations
    }
}

/// Deterministic, time-based anomaly policy.
///
/// Classification depends only on the satellite ordinal and the whole seconds
/// elapsed since run start, never on randomness, so the schedule can be
/// asserted on directly.
#[derive(Debug, Clone)]
pub struct AnomalyInjector {
    rules: Vec<AnomalyRule>,
}

impl AnomalyInjector {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_SCHEDULE.to_vec())
    }

    pub fn with_rules(rules: Vec<AnomalyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AnomalyRule] {
        &self.rules
    }

    fn rule_for(&self, ordinal: u32) -> Option<&AnomalyRule> {
        self.rules.iter().find(|rule| rule.ordinal == ordinal)
    }

    pub fn classify(&self, satellite: &SatelliteId, elapsed_seconds: u64) -> AnomalyKind {
        match self.rule_for(satellite.ordinal()) {
            Some(rule) if rule.is_active(elapsed_seconds) => rule.kind,
            _ => AnomalyKind::None,
        }
    }

    /// First elapsed second at or after `elapsed_seconds` at which the
    /// satellite's window is active. `None` if the satellite has no rule.
    pub fn next_window(&self, satellite: &SatelliteId, elapsed_seconds: u64) -> Option<u64> {
        let rule = self.rule_for(satellite.ordinal())?;
        if rule.period_s == 0 || rule.window_s == 0 {
            return None;
        }
        if rule.is_active(elapsed_seconds) {
            return Some(elapsed_seconds);
        }
        let cycle_start = elapsed_seconds - elapsed_seconds % rule.period_s;
        Some(cycle_start + rule.period_s)
    }
}

impl Default for AnomalyInjector {
    fn default() -> Self {
        Self::new()
    }
}
