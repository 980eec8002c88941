//! Input surface for the capture pipeline.
//!
//! Translates terminal key presses into capture events delivered over a
//! channel. The core session recorder has no dependency on this module; any
//! event source that calls `Session::record_key_event` will do.

pub mod terminal;
pub mod types;

pub use terminal::{CollectorError, TerminalCollector};
pub use types::{CaptureEvent, KeyStroke};
