//! Terminal implementation of the input surface.
//!
//! Puts the terminal into raw mode and reads key presses on a background
//! thread, translating them into [`CaptureEvent`]s delivered over a bounded
//! channel. Key events arrive one at a time in input order, so the capture
//! loop on the receiving side can treat session mutation as single-threaded.

use crate::collector::types::{CaptureEvent, KeyStroke};
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Errors that can occur while running the terminal collector.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyRunning,
    Terminal(String),
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyRunning => write!(f, "Collector is already running"),
            CollectorError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl std::error::Error for CollectorError {}

/// Collects raw-mode key presses and forwards them as capture events.
pub struct TerminalCollector {
    sender: Sender<CaptureEvent>,
    receiver: Receiver<CaptureEvent>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TerminalCollector {
    /// Create a new collector. Nothing is captured until [`start`] is called.
    ///
    /// [`start`]: TerminalCollector::start
    pub fn new() -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Enable raw mode and start the reader thread.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CollectorError::AlreadyRunning);
        }

        enable_raw_mode().map_err(|e| CollectorError::Terminal(e.to_string()))?;
        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        self.handle = Some(std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        let Ok(ev) = event::read() else { break };
                        if let Some(capture) = translate(&ev) {
                            if sender.send(capture).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        }));

        Ok(())
    }

    /// Stop the reader thread and restore the terminal.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        let _ = disable_raw_mode();
    }

    /// Check if the collector is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for capture events.
    pub fn receiver(&self) -> &Receiver<CaptureEvent> {
        &self.receiver
    }
}

impl Default for TerminalCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalCollector {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

/// Map a terminal event to a capture event, if it is one we act on.
fn translate(ev: &Event) -> Option<CaptureEvent> {
    let Event::Key(key) = ev else { return None };
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(CaptureEvent::Quit),
            KeyCode::Char('r') => Some(CaptureEvent::Reset),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(CaptureEvent::Analyze),
        KeyCode::Backspace => Some(CaptureEvent::Key(KeyStroke::new(true, None))),
        KeyCode::Enter => Some(CaptureEvent::Key(KeyStroke::new(false, Some('\n')))),
        KeyCode::Tab => Some(CaptureEvent::Key(KeyStroke::new(false, Some('\t')))),
        KeyCode::Char(c) => Some(CaptureEvent::Key(KeyStroke::new(false, Some(c)))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_translate_characters_and_backspace() {
        match translate(&press(KeyCode::Char('x'), KeyModifiers::NONE)) {
            Some(CaptureEvent::Key(stroke)) => {
                assert!(!stroke.is_deletion);
                assert_eq!(stroke.ch, Some('x'));
            }
            other => panic!("unexpected translation: {other:?}"),
        }

        match translate(&press(KeyCode::Backspace, KeyModifiers::NONE)) {
            Some(CaptureEvent::Key(stroke)) => {
                assert!(stroke.is_deletion);
                assert_eq!(stroke.ch, None);
            }
            other => panic!("unexpected translation: {other:?}"),
        }
    }

    #[test]
    fn test_translate_control_keys() {
        assert!(matches!(
            translate(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(CaptureEvent::Analyze)
        ));
        assert!(matches!(
            translate(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(CaptureEvent::Quit)
        ));
        assert!(matches!(
            translate(&press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(CaptureEvent::Reset)
        ));
    }

    #[test]
    fn test_translate_ignores_releases_and_other_keys() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(translate(&release).is_none());
        assert!(translate(&press(KeyCode::F(1), KeyModifiers::NONE)).is_none());
    }
}
