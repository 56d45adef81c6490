//! # Parlife
//!
//! A parallel turn engine for Conway's Game of Life on a toroidal grid.
//!
//! Parlife advances a binary cellular grid for a fixed number of turns,
//! splitting each turn across a pool of worker threads and reassembling
//! the next generation at a barrier, while a concurrent reporter samples
//! live-cell counts and an interactive control channel can pause, save,
//! or quit the run between turns.
//!
//! ## Core Concepts
//!
//! - **Immutable snapshots**: each turn reads an `Arc<Grid>` frozen at the
//!   turn boundary; only the coordinator builds the next generation
//! - **Band partitioning**: rows are split into contiguous bands, one per
//!   worker, covering the grid exactly once
//! - **Actor model**: isolated threads for workers, progress reporting,
//!   keyboard input, and image I/O
//! - **Event stream**: every observable change (cell flips, turn
//!   completion, alive counts, state changes) is published on a channel
//!
//! ## Example
//!
//! ```rust,ignore
//! use crossbeam_channel::unbounded;
//! use parlife::{run, Params, RunConfig};
//!
//! let (events_tx, events_rx) = unbounded();
//! let (_control_tx, control_rx) = unbounded();
//!
//! let config = RunConfig::new(Params::new(100, 4, 64, 64));
//! run(&config, events_tx, control_rx)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;
pub mod grid;
pub mod io;

// Re-exports for convenience
pub use engine::{
    run, Band, ControlEvent, Event, KeyboardActor, Params, RunConfig, RunHandle, RunState,
};
pub use error::EngineError;
pub use grid::{Cell, Grid, ALIVE, DEAD};
