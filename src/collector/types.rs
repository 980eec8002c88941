//! Event types for the terminal input surface.
//!
//! Only the timing, the deletion flag, and the edit effect on the text buffer
//! are carried; the session recorder itself never sees typed content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed key-down event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStroke {
    /// Timestamp when the key went down
    pub timestamp: DateTime<Utc>,
    /// Whether this is a deletion key (backspace)
    pub is_deletion: bool,
    /// Character the key inserts into the text buffer, if any
    pub ch: Option<char>,
}

impl KeyStroke {
    /// Create a key stroke stamped with the current time.
    pub fn new(is_deletion: bool, ch: Option<char>) -> Self {
        Self {
            timestamp: Utc::now(),
            is_deletion,
            ch,
        }
    }
}

/// Events delivered by the collector to the capture loop.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A key-down to record into the session
    Key(KeyStroke),
    /// The user requested analysis (Esc)
    Analyze,
    /// The user requested a session reset (Ctrl+R)
    Reset,
    /// The user asked to quit (Ctrl+C)
    Quit,
}
