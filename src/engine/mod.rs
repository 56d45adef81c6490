//! Engine: the actors and the turn loop that coordinate a run.
//!
//! This module implements the run as a set of message-passing threads
//! around one coordinating loop:
//! - **Worker pool**: computes grid bands in parallel, one band per
//!   worker per turn
//! - **Progress reporter**: per-turn thread emitting periodic alive
//!   counts
//! - **Keyboard actor**: optional front end turning key presses into
//!   control tokens
//! - **Run driver**: wires everything up and owns the event stream
//!
//! # Architecture
//!
//! ```text
//!                    jobs / band results
//! ┌──────────────┐ ◀─────────────────▶ ┌──────────────┐
//! │ Worker pool  │                     │              │
//! └──────────────┘                     │ Coordinator  │──▶ Event stream
//! ┌──────────────┐    ControlEvent     │  (turn loop) │
//! │Keyboard/tests│ ─────────────────▶  │              │
//! └──────────────┘                     └──────┬───────┘
//!                                             │ start/stop per turn
//!                                             ▼
//!                                      ┌──────────────┐
//!                                      │   Reporter   │──▶ alive counts
//!                                      └──────────────┘
//! ```

mod control;
mod coordinator;
mod driver;
mod events;
mod keyboard;
mod partition;
mod reporter;
mod workers;

pub use driver::{run, Params, RunConfig, RunHandle};
pub use events::{ControlEvent, Event, RunState};
pub use keyboard::KeyboardActor;
pub use partition::{partition, Band};
pub use reporter::Reporter;
pub use workers::WorkerPool;
