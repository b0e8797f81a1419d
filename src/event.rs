use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SATELLITE_LABEL_PREFIX: &str = "SAT-";

/// One synthesized telemetry sample, serialized exactly as the ingestion
/// endpoint expects it on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub event_id: Uuid,
    #[serde(rename = "sat_id")]
    pub satellite_id: String,
    #[serde(rename = "ts_ms")]
    pub timestamp_ms: i64,
    pub latency_ms: f64,
    pub dropped_packets: u32,
    pub sent_packets: u32,
    pub link_quality: f64,
}

/// Identity of one simulated satellite: a 1-based ordinal and its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SatelliteId {
    ordinal: u32,
    label: String,
}

impl SatelliteId {
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            label: format!("{SATELLITE_LABEL_PREFIX}{ordinal:03}"),
        }
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl core::fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.label)
    }
}

/// The fixed set of satellites simulated during a run.
#[derive(Debug, Clone)]
pub struct Fleet {
    satellites: Vec<SatelliteId>,
}

impl Fleet {
    /// Builds `SAT-001` through `SAT-<size>`.
    pub fn new(size: u32) -> Self {
        Self {
            satellites: (1..=size).map(SatelliteId::new).collect(),
        }
    }

    pub fn satellites(&self) -> &[SatelliteId] {
        &self.satellites
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}
