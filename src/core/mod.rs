//! Core capture and feature-derivation pipeline.
//!
//! The session recorder accumulates keystroke timing; the extractor reduces a
//! session snapshot into the feature vector sent for classification.

pub mod features;
pub mod session;

pub use features::{
    check_input_gate, extract, ExtractError, FeatureVector, InputGateError, MIN_INPUT_CHARS,
};
pub use session::{LiveStats, Session};
