//! Progress reporter: periodic live-cell counts for one turn.
//!
//! One reporter is started per turn with that turn's snapshot and stopped
//! before the coordinator moves on. The stop protocol is signal-then-join:
//! `stop()` returns only after the thread has exited, so no count event
//! can land after the turn boundary has been acknowledged. A turn that
//! finishes faster than the interval emits no count at all; that is
//! expected.

use super::events::Event;
use crate::grid::Grid;
use crossbeam_channel::{bounded, select, tick, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A per-turn reporter thread sampling the turn's snapshot.
pub struct Reporter {
    /// Handle to the reporter thread.
    handle: Option<JoinHandle<()>>,
    /// Dropping this signals the thread to stop.
    stop_tx: Option<Sender<()>>,
}

impl Reporter {
    /// Start a reporter for one turn.
    ///
    /// Every `interval`, the reporter counts the live cells in `snapshot`
    /// and emits an [`Event::AliveCellsCount`] tagged with `turn`. A
    /// dropped event receiver is ignored; the reporter never aborts the
    /// turn it reports on.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the reporter thread.
    pub fn start(
        snapshot: Arc<Grid>,
        turn: usize,
        interval: Duration,
        events: Sender<Event>,
    ) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("parlife-reporter".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            let count = snapshot.alive_count();
                            let _ = events.send(Event::AliveCellsCount {
                                completed_turns: turn,
                                count,
                            });
                        }
                    }
                }
            })
            .expect("Failed to spawn reporter thread");

        Self {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
        }
    }

    /// Stop the reporter and wait for it to exit.
    ///
    /// The join is the acknowledgment: once this returns, no further
    /// count event for this turn can be emitted.
    pub fn stop(mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        drop(self.stop_tx.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ALIVE;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_reporter_emits_counts() {
        let mut grid = Grid::new(8, 8);
        grid.set(1, 1, ALIVE);
        grid.set(2, 2, ALIVE);

        let (events_tx, events_rx) = unbounded();
        let reporter = Reporter::start(
            Arc::new(grid),
            5,
            Duration::from_millis(10),
            events_tx,
        );

        let event = events_rx
            .recv_timeout(Duration::from_millis(500))
            .expect("reporter should tick");
        assert_eq!(
            event,
            Event::AliveCellsCount {
                completed_turns: 5,
                count: 2
            }
        );

        reporter.stop();
    }

    #[test]
    fn test_stop_silences_reporter() {
        let (events_tx, events_rx) = unbounded();
        let reporter = Reporter::start(
            Arc::new(Grid::new(8, 8)),
            0,
            Duration::from_millis(5),
            events_tx,
        );
        reporter.stop();

        // After the join, nothing more may arrive.
        let drained: Vec<_> = events_rx.try_iter().collect();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(events_rx.try_iter().count(), 0);
        // Anything drained before the stop must be from the live phase.
        assert!(drained.iter().all(|e| e.completed_turns() == 0));
    }

    #[test]
    fn test_fast_turn_emits_nothing() {
        let (events_tx, events_rx) = unbounded();
        let reporter = Reporter::start(
            Arc::new(Grid::new(8, 8)),
            0,
            Duration::from_secs(60),
            events_tx,
        );
        reporter.stop();
        assert_eq!(events_rx.try_iter().count(), 0);
    }

    #[test]
    fn test_reporter_survives_dropped_receiver() {
        let (events_tx, events_rx) = unbounded();
        drop(events_rx);
        let reporter = Reporter::start(
            Arc::new(Grid::new(8, 8)),
            0,
            Duration::from_millis(5),
            events_tx,
        );
        thread::sleep(Duration::from_millis(20));
        reporter.stop();
    }
}
