//! Typestress - keystroke-timing capture and stress analysis client.
//!
//! This library turns a raw, irregular stream of key events into a small,
//! numerically well-defined feature vector and submits it to an external
//! stress prediction service for a verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Typestress                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │ Collector  │──▶│  Session   │──▶│  Features  │            │
//! │  │ (terminal) │   │ (recorder) │   │ (extract)  │            │
//! │  └────────────┘   └────────────┘   └─────┬──────┘            │
//! │                                          ▼                   │
//! │                                   ┌────────────┐             │
//! │                                   │ Predictor  │──▶ service  │
//! │                                   │  (client)  │             │
//! │                                   └────────────┘             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session recorder and the extractor are pure bookkeeping with no UI or
//! network dependency; the collector and predictor are the I/O edges.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use typestress::core::{extract, Session};
//!
//! let base = Utc::now();
//! let mut session = Session::new();
//! for offset in [0, 100, 250, 400] {
//!     session.record_key_event(false, base + Duration::milliseconds(offset));
//! }
//!
//! let features = extract(&session, base + Duration::milliseconds(400)).unwrap();
//! assert!((features.typing_speed - 7.5).abs() < 1e-9);
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod display;
pub mod predictor;

// Re-export key types at crate root for convenience
pub use collector::{CaptureEvent, CollectorError, KeyStroke, TerminalCollector};
pub use config::{Config, ConfigError};
pub use core::{
    check_input_gate, extract, ExtractError, FeatureVector, InputGateError, LiveStats, Session,
    MIN_INPUT_CHARS,
};
pub use display::render_report;
pub use predictor::{
    BlockingPredictorClient, FeatureEcho, Prediction, PredictorClient, PredictorConfig,
    PredictorError, StressLevel,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
