//! Keyboard front end: translate key presses into control tokens.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture `p`/`s`/`q` without blocking the turn loop. The engine
//! never sees the terminal, only the resulting [`ControlEvent`] channel,
//! so headless runs and tests inject tokens directly instead.

use super::events::ControlEvent;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Keyboard actor that polls terminal events for control keys.
pub struct KeyboardActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl KeyboardActor {
    /// Spawn the keyboard actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send control tokens to the run.
    /// * `poll_timeout` - How long to wait for events before checking
    ///   shutdown.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the input thread.
    pub fn spawn(sender: Sender<ControlEvent>, poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("parlife-keyboard".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn keyboard thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the keyboard thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the keyboard thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main polling loop.
    fn run_loop(sender: &Sender<ControlEvent>, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(token) = Self::convert_event(&event) {
                            if sender.send(token).is_err() {
                                // Run finished, exit
                                break;
                            }
                        }
                    }
                    Err(e) => warn!("keyboard read failed: {e}"),
                },
                Ok(false) => {
                    // No event, loop again (will check shutdown)
                }
                Err(e) => warn!("keyboard poll failed: {e}"),
            }
        }
    }

    /// Map a crossterm event to a control token.
    fn convert_event(event: &Event) -> Option<ControlEvent> {
        let Event::Key(key_event) = event else {
            return None;
        };
        // Only process key press events (not release or repeat)
        if key_event.kind != KeyEventKind::Press {
            return None;
        }

        match key_event.code {
            KeyCode::Char('p') => Some(ControlEvent::TogglePause),
            KeyCode::Char('s') => Some(ControlEvent::Save),
            KeyCode::Char('q') => Some(ControlEvent::Quit),
            _ => None,
        }
    }
}

impl Drop for KeyboardActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
