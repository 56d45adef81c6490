//! Turn coordinator: the synchronization core of a run.
//!
//! The coordinator owns the grid across turns. Each turn it freezes the
//! current generation as an immutable snapshot, starts that turn's
//! progress reporter, fans bands out to the worker pool, blocks at the
//! barrier for the reassembled next generation, publishes the cell flips
//! and the turn completion, stops the reporter, and only then consults
//! the control handler. No partial turn is ever abandoned: quit takes
//! effect after the turn that was in flight.

use super::control::Controller;
use super::driver::Params;
use super::events::{ControlEvent, Event, RunState};
use super::partition::partition;
use super::reporter::Reporter;
use super::workers::WorkerPool;
use crate::error::EngineError;
use crate::grid::{changed_cells, Grid};
use crate::io::IoActor;
use crossbeam_channel::Sender;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// Drives the turn loop for one run.
pub(crate) struct Coordinator<'run> {
    params: Params,
    report_interval: Duration,
    pool: &'run WorkerPool,
    io: &'run IoActor,
    events: &'run Sender<Event>,
    control: Controller,
}

impl<'run> Coordinator<'run> {
    pub(crate) fn new(
        params: Params,
        report_interval: Duration,
        pool: &'run WorkerPool,
        io: &'run IoActor,
        events: &'run Sender<Event>,
        control: Controller,
    ) -> Self {
        Self {
            params,
            report_interval,
            pool,
            io,
            events,
            control,
        }
    }

    /// Run every turn, returning the final grid and the last executed
    /// turn index.
    pub(crate) fn run(&self, initial: Grid) -> Result<(Arc<Grid>, usize), EngineError> {
        let mut grid = Arc::new(initial);

        // Initial pass: every cell alive at load time is a flip on turn 0.
        for cell in grid.alive_cells() {
            self.emit(Event::CellFlipped {
                completed_turns: 0,
                cell,
            })?;
        }

        // The workload never changes mid-run, so bands are computed once.
        let bands = partition(self.params.image_height, self.params.threads);
        let mut last_turn = 0;

        for turn in 0..self.params.turns {
            let reporter = Reporter::start(
                Arc::clone(&grid),
                turn,
                self.report_interval,
                self.events.clone(),
            );

            // Fan out, then block at the barrier for the reassembled
            // next generation.
            let next = self.pool.run_turn(&grid, &bands)?;

            for cell in changed_cells(&grid, &next) {
                self.emit(Event::CellFlipped {
                    completed_turns: turn,
                    cell,
                })?;
            }
            self.emit(Event::TurnComplete {
                completed_turns: turn,
            })?;

            // Signal + join: once this returns, the reporter can no
            // longer observe the outgoing snapshot.
            reporter.stop();

            grid = Arc::new(next);
            last_turn = turn;

            if self.check_control(&grid, turn)? == RunState::Quitting {
                info!("quit requested, stopping after turn {turn}");
                break;
            }
        }

        Ok((grid, last_turn))
    }

    /// One non-blocking control check between turns.
    ///
    /// Returns the run state to continue with; `Quitting` ends the loop.
    /// The pause branch blocks inside [`Controller::wait_resume`] until
    /// the matching toggle token arrives.
    fn check_control(&self, grid: &Arc<Grid>, turn: usize) -> Result<RunState, EngineError> {
        match self.control.poll() {
            None => Ok(RunState::Executing),
            Some(ControlEvent::Save) => {
                self.save_snapshot(grid, turn)?;
                Ok(RunState::Executing)
            }
            Some(ControlEvent::Quit) => {
                self.save_snapshot(grid, turn)?;
                Ok(RunState::Quitting)
            }
            Some(ControlEvent::TogglePause) => {
                debug!("paused at turn {turn}");
                self.emit(Event::StateChange {
                    completed_turns: turn,
                    new_state: RunState::Paused,
                })?;
                self.control.wait_resume()?;
                debug!("resumed at turn {turn}");
                self.emit(Event::StateChange {
                    completed_turns: turn,
                    new_state: RunState::Executing,
                })?;
                Ok(RunState::Executing)
            }
        }
    }

    /// Hand the current generation to the output collaborator.
    fn save_snapshot(&self, grid: &Arc<Grid>, turn: usize) -> Result<(), EngineError> {
        let filename = format!(
            "{}x{}x{}",
            self.params.image_width, self.params.image_height, turn
        );
        self.io.save(filename.clone(), Arc::clone(grid))?;
        self.emit(Event::ImageOutputComplete {
            completed_turns: turn,
            filename,
        })
    }

    fn emit(&self, event: Event) -> Result<(), EngineError> {
        self.events.send(event).map_err(|_| EngineError::EventsClosed)
    }
}
