//! Feature extraction from a session snapshot.
//!
//! Reduces the recorded timing state into the fixed three-number vector the
//! prediction service consumes. Extraction is a pure function of the session
//! and the request time.

use crate::core::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum typed-text length before an analysis may be requested.
pub const MIN_INPUT_CHARS: usize = 50;

/// The feature vector submitted for classification.
///
/// Serializes to exactly the three named numeric fields the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Counted key events per elapsed second
    pub typing_speed: f64,
    /// Mean inter-key gap in milliseconds
    pub avg_pause: f64,
    /// Deletion key events per counted key event
    pub error_rate: f64,
}

/// Extraction-layer errors.
///
/// These are programming invariants: the input gate keeps them from surfacing
/// during correct calling discipline, but extraction still rejects violations
/// rather than dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// No key event has been recorded, so there is no session start time
    NotStarted,
    /// The session has a start marker but no counted keystrokes
    NoKeyEvents,
    /// Elapsed time since session start is zero or negative (clock skew,
    /// or extraction requested at the instant of the first event)
    NonPositiveElapsed,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::NotStarted => write!(f, "session has not recorded any key events"),
            ExtractError::NoKeyEvents => write!(f, "session has no counted keystrokes"),
            ExtractError::NonPositiveElapsed => {
                write!(f, "non-positive elapsed time since session start")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Reasons an analysis request is rejected before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputGateError {
    /// Fewer typed characters than the configured minimum
    TooFewChars { typed: usize, required: usize },
    /// No counted key events were recorded
    NoKeyEvents,
}

impl std::fmt::Display for InputGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputGateError::TooFewChars { typed, required } => write!(
                f,
                "please type at least {required} characters for accurate analysis ({typed} so far)"
            ),
            InputGateError::NoKeyEvents => {
                write!(f, "no typing data collected, please try typing again")
            }
        }
    }
}

impl std::error::Error for InputGateError {}

/// Check the minimum-input gate for an analysis request.
///
/// Analysis requires at least `required` typed characters and a non-zero
/// counted key count. Checked by the caller before [`extract`] so that
/// insufficient input never reaches the extraction layer.
pub fn check_input_gate(
    char_count: usize,
    required: usize,
    session: &Session,
) -> Result<(), InputGateError> {
    if char_count < required {
        return Err(InputGateError::TooFewChars {
            typed: char_count,
            required,
        });
    }
    if session.key_count() == 0 {
        return Err(InputGateError::NoKeyEvents);
    }
    Ok(())
}

/// Compute the feature vector from a session snapshot at time `now`.
///
/// Pure: identical inputs yield identical output and the session is never
/// mutated. All returned values are non-negative and finite.
pub fn extract(session: &Session, now: DateTime<Utc>) -> Result<FeatureVector, ExtractError> {
    let elapsed_seconds = session
        .elapsed_seconds(now)
        .ok_or(ExtractError::NotStarted)?;
    if session.key_count() == 0 {
        return Err(ExtractError::NoKeyEvents);
    }
    if elapsed_seconds <= 0.0 {
        return Err(ExtractError::NonPositiveElapsed);
    }

    let typing_speed = session.key_count() as f64 / elapsed_seconds;

    // Empty pauses is excluded by the key-count check above, but guard anyway
    let pauses = session.pauses();
    let avg_pause = if pauses.is_empty() {
        0.0
    } else {
        pauses.iter().sum::<i64>() as f64 / pauses.len() as f64
    };

    let error_rate = session.backspace_count() as f64 / session.key_count() as f64;

    Ok(FeatureVector {
        typing_speed,
        avg_pause,
        error_rate,
    })
}
