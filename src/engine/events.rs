//! Message types for the run: events, lifecycle states, control tokens.
//!
//! These enums define the protocol between the engine and the outside
//! world: the event stream consumers read, and the control tokens they
//! inject.

use crate::grid::Cell;
use std::fmt;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Turns are being executed.
    Executing,
    /// The run is blocked waiting for a resume token.
    Paused,
    /// The run is terminating after the current turn. Terminal.
    Quitting,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executing => write!(f, "Executing"),
            Self::Paused => write!(f, "Paused"),
            Self::Quitting => write!(f, "Quitting"),
        }
    }
}

/// A discrete control token consumed between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Pause the run, or resume it if already paused.
    TogglePause,
    /// Save a snapshot of the current grid.
    Save,
    /// Save, then terminate after the current turn.
    Quit,
}

/// An observable occurrence during a run.
///
/// Ordering within a turn: all `CellFlipped` events, then `TurnComplete`.
/// `AliveCellsCount` events are produced asynchronously by the reporter
/// and land between turn completions, at most one turn stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A cell changed state on the given turn.
    CellFlipped {
        /// Turn the flip belongs to.
        completed_turns: usize,
        /// The cell that changed.
        cell: Cell,
    },

    /// All cells for the given turn have been processed.
    TurnComplete {
        /// The completed turn.
        completed_turns: usize,
    },

    /// Periodic live-cell count from the progress reporter.
    AliveCellsCount {
        /// Turn the count was sampled on.
        completed_turns: usize,
        /// Number of live cells in that turn's snapshot.
        count: usize,
    },

    /// A grid snapshot was handed to the output collaborator.
    ImageOutputComplete {
        /// Turn the snapshot belongs to.
        completed_turns: usize,
        /// Name of the written image.
        filename: String,
    },

    /// The run changed lifecycle state.
    StateChange {
        /// Turn at which the transition happened.
        completed_turns: usize,
        /// The state entered.
        new_state: RunState,
    },

    /// The run finished. Fires at most once, last on the stream.
    FinalTurnComplete {
        /// Last executed turn.
        completed_turns: usize,
        /// Every cell alive in the final grid, row-major.
        alive: Vec<Cell>,
    },
}

impl Event {
    /// The turn this event reports on.
    pub const fn completed_turns(&self) -> usize {
        match self {
            Self::CellFlipped { completed_turns, .. }
            | Self::TurnComplete { completed_turns }
            | Self::AliveCellsCount { completed_turns, .. }
            | Self::ImageOutputComplete { completed_turns, .. }
            | Self::StateChange { completed_turns, .. }
            | Self::FinalTurnComplete { completed_turns, .. } => *completed_turns,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellFlipped { completed_turns, cell } => {
                write!(f, "turn {completed_turns}: cell {cell:?} flipped")
            }
            Self::TurnComplete { completed_turns } => {
                write!(f, "turn {completed_turns} complete")
            }
            Self::AliveCellsCount { completed_turns, count } => {
                write!(f, "turn {completed_turns}: {count} cells alive")
            }
            Self::ImageOutputComplete { completed_turns, filename } => {
                write!(f, "turn {completed_turns}: wrote {filename}")
            }
            Self::StateChange { completed_turns, new_state } => {
                write!(f, "turn {completed_turns}: now {new_state}")
            }
            Self::FinalTurnComplete { completed_turns, alive } => {
                write!(
                    f,
                    "final turn {completed_turns}: {} cells alive",
                    alive.len()
                )
            }
        }
    }
}
