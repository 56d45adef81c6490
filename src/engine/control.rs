//! Control handler: non-blocking consumption of control tokens.
//!
//! The coordinator checks for input once per turn; absence of input must
//! never block the turn loop. Only the pause branch blocks, and only
//! until the matching resume token arrives.

use super::events::ControlEvent;
use crate::error::EngineError;
use crossbeam_channel::{Receiver, TryRecvError};

/// Wraps the control token source with the poll/pause semantics the
/// coordinator needs.
pub struct Controller {
    rx: Receiver<ControlEvent>,
}

impl Controller {
    /// Wrap a control token receiver.
    pub const fn new(rx: Receiver<ControlEvent>) -> Self {
        Self { rx }
    }

    /// Poll for a pending control token without blocking.
    ///
    /// Returns `None` when no token is pending. A disconnected source is
    /// indistinguishable from one that never sends: headless runs simply
    /// drop the sender.
    pub fn poll(&self) -> Option<ControlEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the resume token arrives.
    ///
    /// Only [`ControlEvent::TogglePause`] resumes; any other token
    /// received while paused is discarded. A source that disconnects
    /// while paused is fatal, since the run could never continue.
    pub fn wait_resume(&self) -> Result<(), EngineError> {
        loop {
            match self.rx.recv() {
                Ok(ControlEvent::TogglePause) => return Ok(()),
                Ok(_) => {}
                Err(_) => return Err(EngineError::ControlClosed),
            }
        }
    }
}
