//! # Satellite Telemetry Load Generator
//!
//! Simulates telemetry traffic from a fleet of satellites and delivers it,
//! rate-limited, to an HTTP ingestion endpoint. A few satellites follow a
//! fixed fault schedule so downstream alerting can be validated without real
//! hardware.
//!
//! ## Features
//!
//! - **Deterministic anomaly windows**: latency spikes, packet-loss bursts and
//!   link-quality degradation on a repeating per-satellite schedule
//! - **Randomized metrics**: uniform sampling inside nominal or widened ranges,
//!   optionally seeded for reproducible runs
//! - **Upper-bound pacing**: fixed delay of `1/qps` after every event
//! - **Fire-and-forget delivery**: JSON over HTTP POST with a 2 second deadline,
//!   failures only lower the sent count
//!
//! ## Quick Start
//!
//! ```no_run
//! use satload::{GeneratorConfig, HttpPublisher, RunController};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig {
//!     qps: 10.0,
//!     seconds: 5,
//!     ..GeneratorConfig::default()
//! };
//! let publisher = HttpPublisher::new(config.endpoint_url(), config.publish_timeout)?;
//! let mut controller = RunController::new(config, publisher)?;
//!
//! let summary = controller.run().await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`event`] - Telemetry event schema and satellite fleet
//! - [`anomaly`] - Per-satellite anomaly schedule
//! - [`synth`] - Event synthesis and wall clock
//! - [`pacer`] - Rate pacing
//! - [`publisher`] - HTTP delivery
//! - [`config`] - Run configuration and validation
//! - [`controller`] - The run loop and its accounting

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod anomaly;
pub mod config;
pub mod controller;
pub mod event;
pub mod pacer;
pub mod publisher;
pub mod synth;

// Re-export main public types for convenience
pub use anomaly::{AnomalyInjector, AnomalyKind};
pub use config::{ConfigError, GeneratorConfig};
pub use controller::{RunController, RunState, RunSummary};
pub use event::{Fleet, SatelliteId, TelemetryEvent};
pub use publisher::{HttpPublisher, Publisher, TransportError};
