//! Run driver: configuration, wiring, and the lifetime of one run.
//!
//! [`run`] owns everything from the initial image load to the closure of
//! the event stream: it validates the parameters, spawns the I/O actor
//! and the worker pool, hands the grid to the coordinator, publishes the
//! final event, and waits for the output collaborator to drain before
//! dropping the event sender.

use super::control::Controller;
use super::coordinator::Coordinator;
use super::events::{ControlEvent, Event};
use super::workers::WorkerPool;
use crate::error::EngineError;
use crate::io::IoActor;
use crossbeam_channel::{Receiver, Sender};
use log::info;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Immutable run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Number of turns to execute.
    pub turns: usize,
    /// Number of worker threads.
    pub threads: usize,
    /// Grid width in cells.
    pub image_width: usize,
    /// Grid height in cells.
    pub image_height: usize,
}

impl Params {
    /// Create run parameters.
    pub const fn new(turns: usize, threads: usize, image_width: usize, image_height: usize) -> Self {
        Self {
            turns,
            threads,
            image_width,
            image_height,
        }
    }

    /// Reject misconfiguration before the run starts.
    ///
    /// Dimensions must be positive and the worker count must fit the
    /// grid: more workers than rows would produce zero-row bands.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(EngineError::InvalidParams(format!(
                "grid dimensions must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.threads == 0 {
            return Err(EngineError::InvalidParams(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.threads > self.image_height {
            return Err(EngineError::InvalidParams(format!(
                "{} threads cannot split {} rows",
                self.threads, self.image_height
            )));
        }
        Ok(())
    }

    /// Name of the input image for these dimensions.
    pub(crate) fn input_filename(&self) -> String {
        format!("{}x{}", self.image_width, self.image_height)
    }
}

/// Full configuration for a run: the parameters plus the ambient pieces.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Run parameters.
    pub params: Params,
    /// Directory the I/O collaborator reads and writes images in.
    pub image_dir: PathBuf,
    /// Progress reporter interval.
    pub report_interval: Duration,
}

impl RunConfig {
    /// Configuration with the default image directory (`images/`) and
    /// report interval (2 seconds).
    pub fn new(params: Params) -> Self {
        Self {
            params,
            image_dir: PathBuf::from("images"),
            report_interval: Duration::from_secs(2),
        }
    }
}

/// Execute a run to completion on the calling thread.
///
/// Loads `{width}x{height}.pgm` from the configured image directory,
/// executes every turn (or stops early on a quit token from `control`),
/// emits [`Event::FinalTurnComplete`], waits for the I/O collaborator to
/// confirm idle, and closes the event stream by dropping `events`. The
/// stream closes exactly once, after the final event — pass the only
/// sender, not a clone.
pub fn run(
    config: &RunConfig,
    events: Sender<Event>,
    control: Receiver<ControlEvent>,
) -> Result<(), EngineError> {
    config.params.validate()?;
    let params = config.params;

    let io = IoActor::spawn(config.image_dir.clone());
    let initial = io.load(
        &params.input_filename(),
        params.image_width,
        params.image_height,
    )?;
    info!(
        "starting: {}x{} grid, {} turns, {} threads",
        params.image_width, params.image_height, params.turns, params.threads
    );

    let pool = WorkerPool::spawn(params.threads);
    let coordinator = Coordinator::new(
        params,
        config.report_interval,
        &pool,
        &io,
        &events,
        Controller::new(control),
    );
    let (final_grid, last_turn) = coordinator.run(initial)?;

    events
        .send(Event::FinalTurnComplete {
            completed_turns: last_turn,
            alive: final_grid.alive_cells(),
        })
        .map_err(|_| EngineError::EventsClosed)?;

    // No output may be lost on shutdown: the stream stays open until the
    // I/O collaborator confirms it has drained.
    io.check_idle()?;
    info!("finished after turn {last_turn}");

    Ok(())
}

/// A run executing on its own thread.
pub struct RunHandle {
    handle: Option<JoinHandle<Result<(), EngineError>>>,
}

impl RunHandle {
    /// Spawn [`run`] on a named thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the run thread.
    pub fn spawn(
        config: RunConfig,
        events: Sender<Event>,
        control: Receiver<ControlEvent>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("parlife-run".to_string())
            .spawn(move || run(&config, events, control))
            .expect("Failed to spawn run thread");
        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the run to finish and return its result.
    pub fn join(mut self) -> Result<(), EngineError> {
        self.handle
            .take()
            .expect("run handle joined once")
            .join()
            .expect("run thread panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::RunState;
    use crate::grid::{rules, Cell, Grid, ALIVE};
    use crate::io::pgm;
    use crossbeam_channel::unbounded;

    fn glider() -> Grid {
        let mut grid = Grid::new(8, 8);
        for (x, y) in [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
            grid.set(x, y, ALIVE);
        }
        grid
    }

    /// Write `initial` as the input image for `params` into a fresh
    /// scratch directory and return a config pointing at it.
    fn config_with_input(name: &str, params: Params, initial: &Grid) -> RunConfig {
        let dir = std::env::temp_dir().join(format!("parlife-driver-{}-{name}", std::process::id()));
        let path = dir.join(format!("{}.pgm", params.input_filename()));
        pgm::write_pgm(&path, initial).unwrap();
        let mut config = RunConfig::new(params);
        config.image_dir = dir;
        config
    }

    fn run_collecting(
        config: &RunConfig,
        tokens: &[ControlEvent],
    ) -> (Result<(), EngineError>, Vec<Event>) {
        let (events_tx, events_rx) = unbounded();
        let (control_tx, control_rx) = unbounded();
        for &token in tokens {
            control_tx.send(token).unwrap();
        }
        let result = run(config, events_tx, control_rx);
        let events: Vec<Event> = events_rx.try_iter().collect();
        // The sender was dropped inside run; the stream must be closed.
        assert!(events_rx.try_recv().is_err());
        (result, events)
    }

    /// Flip events per turn, ignoring the asynchronous alive counts.
    fn flips_by_turn(events: &[Event], turns: usize) -> Vec<Vec<Cell>> {
        let mut flips = vec![Vec::new(); turns + 1];
        for event in events {
            if let Event::CellFlipped {
                completed_turns,
                cell,
            } = event
            {
                flips[*completed_turns].push(*cell);
            }
        }
        flips
    }

    #[test]
    fn test_validate_rejects_misconfiguration() {
        assert!(Params::new(1, 1, 0, 8).validate().is_err());
        assert!(Params::new(1, 1, 8, 0).validate().is_err());
        assert!(Params::new(1, 0, 8, 8).validate().is_err());
        assert!(Params::new(1, 9, 8, 8).validate().is_err());
        assert!(Params::new(0, 8, 8, 8).validate().is_ok());
    }

    #[test]
    fn test_flip_events_match_cell_diffs() {
        let initial = glider();
        let params = Params::new(4, 2, 8, 8);
        let config = config_with_input("flips", params, &initial);

        let (result, events) = run_collecting(&config, &[]);
        result.unwrap();

        // Reference generations on a single thread.
        let mut generations = vec![initial.clone()];
        for _ in 0..4 {
            generations.push(rules::step(generations.last().unwrap()));
        }

        // Turn 0 carries the initial pass plus the first diff; later
        // turns carry exactly their diff.
        let flips = flips_by_turn(&events, 4);
        let mut expected_turn0 = initial.alive_cells();
        expected_turn0.extend(crate::grid::changed_cells(&generations[0], &generations[1]));
        assert_eq!(flips[0], expected_turn0);
        for turn in 1..4 {
            assert_eq!(
                flips[turn],
                crate::grid::changed_cells(&generations[turn], &generations[turn + 1]),
                "turn {turn}"
            );
        }

        // Final event carries the last generation's alive cells.
        assert_eq!(
            events.last(),
            Some(&Event::FinalTurnComplete {
                completed_turns: 3,
                alive: generations[4].alive_cells()
            })
        );
    }

    #[test]
    fn test_turn_completes_are_ordered() {
        let config = config_with_input("order", Params::new(5, 3, 8, 8), &glider());
        let (result, events) = run_collecting(&config, &[]);
        result.unwrap();

        let completed: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                Event::TurnComplete { completed_turns } => Some(*completed_turns),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![0, 1, 2, 3, 4]);

        // Within a turn, flips precede the completion event.
        let last_flip = events
            .iter()
            .rposition(|e| matches!(e, Event::CellFlipped { completed_turns: 4, .. }))
            .unwrap();
        let complete = events
            .iter()
            .position(|e| matches!(e, Event::TurnComplete { completed_turns: 4 }))
            .unwrap();
        assert!(last_flip < complete);
    }

    #[test]
    fn test_outcome_independent_of_thread_count() {
        let mut finals = Vec::new();
        for threads in [1, 2, 3, 8] {
            let params = Params::new(6, threads, 8, 8);
            let config = config_with_input(&format!("threads{threads}"), params, &glider());
            let (result, events) = run_collecting(&config, &[]);
            result.unwrap();

            let Some(Event::FinalTurnComplete { alive, .. }) = events.last() else {
                panic!("missing final event for threads={threads}");
            };
            finals.push(alive.clone());
        }
        assert!(finals.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_quit_saves_then_closes_stream() {
        let params = Params::new(10, 2, 8, 8);
        let config = config_with_input("quit", params, &glider());
        let (result, events) = run_collecting(&config, &[ControlEvent::Quit]);
        result.unwrap();

        // The quit is polled after turn 0: one turn executed, then save,
        // then the final event, then closure.
        let tail: Vec<&Event> = events.iter().rev().take(3).collect();
        assert!(matches!(
            tail[2],
            Event::TurnComplete { completed_turns: 0 }
        ));
        assert_eq!(
            tail[1],
            &Event::ImageOutputComplete {
                completed_turns: 0,
                filename: "8x8x0".to_string()
            }
        );
        assert!(matches!(
            tail[0],
            Event::FinalTurnComplete { completed_turns: 0, .. }
        ));

        // The save landed, and holds the post-turn generation.
        let saved = pgm::read_pgm(&config.image_dir.join("8x8x0.pgm"), 8, 8).unwrap();
        assert_eq!(saved, rules::step(&glider()));
    }

    #[test]
    fn test_save_keeps_running() {
        let params = Params::new(3, 2, 8, 8);
        let config = config_with_input("save", params, &glider());
        let (result, events) = run_collecting(&config, &[ControlEvent::Save]);
        result.unwrap();

        assert!(events.contains(&Event::ImageOutputComplete {
            completed_turns: 0,
            filename: "8x8x0".to_string()
        }));
        // All three turns still ran.
        assert!(events.contains(&Event::TurnComplete { completed_turns: 2 }));
    }

    #[test]
    fn test_pause_resume_emits_two_state_changes() {
        let params = Params::new(2, 2, 8, 8);
        let config = config_with_input("pause", params, &glider());
        let (result, events) = run_collecting(
            &config,
            &[ControlEvent::TogglePause, ControlEvent::TogglePause],
        );
        result.unwrap();

        let changes: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::StateChange { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![
                &Event::StateChange {
                    completed_turns: 0,
                    new_state: RunState::Paused
                },
                &Event::StateChange {
                    completed_turns: 0,
                    new_state: RunState::Executing
                },
            ]
        );

        // No turn progressed between the pause and the resume.
        let paused = events.iter().position(|e| *e == *changes[0]).unwrap();
        let resumed = events.iter().position(|e| *e == *changes[1]).unwrap();
        assert!(!events[paused..resumed]
            .iter()
            .any(|e| matches!(e, Event::TurnComplete { .. })));
        // Both turns still completed.
        assert!(events.contains(&Event::TurnComplete { completed_turns: 1 }));
    }

    #[test]
    fn test_zero_turns_reports_initial_grid() {
        let initial = glider();
        let params = Params::new(0, 2, 8, 8);
        let config = config_with_input("zero", params, &initial);
        let (result, events) = run_collecting(&config, &[]);
        result.unwrap();

        assert_eq!(
            events.last(),
            Some(&Event::FinalTurnComplete {
                completed_turns: 0,
                alive: initial.alive_cells()
            })
        );
        // The initial pass still flips every live cell.
        assert_eq!(flips_by_turn(&events, 0)[0], initial.alive_cells());
    }

    #[test]
    fn test_missing_input_aborts_before_any_event() {
        let dir = std::env::temp_dir().join(format!("parlife-driver-{}-empty", std::process::id()));
        let mut config = RunConfig::new(Params::new(1, 1, 8, 8));
        config.image_dir = dir;

        let (events_tx, events_rx) = unbounded();
        let (_control_tx, control_rx) = unbounded();
        let result = run(&config, events_tx, control_rx);

        assert!(matches!(result, Err(EngineError::Io(_))));
        assert_eq!(events_rx.try_iter().count(), 0);
    }

    #[test]
    fn test_run_handle_spawns_and_joins() {
        let config = config_with_input("handle", Params::new(2, 2, 8, 8), &glider());
        let (events_tx, events_rx) = unbounded();
        let (_control_tx, control_rx) = unbounded();

        let handle = RunHandle::spawn(config, events_tx, control_rx);
        // Drain concurrently the way an interactive front end would.
        let mut saw_final = false;
        for event in events_rx {
            if matches!(event, Event::FinalTurnComplete { .. }) {
                saw_final = true;
            }
        }
        assert!(saw_final);
        handle.join().unwrap();
    }
}
