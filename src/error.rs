//! Error type for engine runs.
//!
//! Every failure here is fatal to the run: misconfiguration is rejected
//! before the first turn, and collaborator failures abort rather than
//! surface partial state on the event stream.

use std::fmt;
use std::io;

/// Errors that abort a run.
#[derive(Debug)]
pub enum EngineError {
    /// Run parameters failed validation before the run started.
    InvalidParams(String),

    /// An I/O collaborator operation failed (unreadable input,
    /// unwritable output).
    Io(io::Error),

    /// An input image was readable but malformed or out of range.
    BadImage(String),

    /// A worker thread died mid-run. Workers are pure and input-bounded,
    /// so this indicates a programming defect.
    WorkerFailed,

    /// The control source disconnected while the run was paused, so the
    /// run could never resume.
    ControlClosed,

    /// The event stream consumer hung up.
    EventsClosed,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams(reason) => write!(f, "invalid run parameters: {reason}"),
            Self::Io(err) => write!(f, "i/o collaborator failure: {err}"),
            Self::BadImage(reason) => write!(f, "bad input image: {reason}"),
            Self::WorkerFailed => write!(f, "worker thread died"),
            Self::ControlClosed => write!(f, "control source disconnected while paused"),
            Self::EventsClosed => write!(f, "event stream consumer disconnected"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
