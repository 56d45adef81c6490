//! Worker pool: parallel band computation with a collection barrier.
//!
//! The pool spawns one thread per configured worker at run start. Each
//! turn, the coordinator sends every worker exactly one job carrying the
//! turn's immutable snapshot and that worker's band, then blocks
//! collecting the band results in band order. Every worker has its own
//! result channel, so reassembly order is fixed by construction no
//! matter which worker finishes first, and a worker that dies surfaces
//! as a disconnect at the barrier instead of a hang.

use super::partition::Band;
use crate::error::EngineError;
use crate::grid::{rules, Grid};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// One turn's work for one worker.
struct Job {
    /// Read-only snapshot of the whole grid.
    snapshot: Arc<Grid>,
    /// Row range this worker computes.
    band: Band,
}

/// Channel pair the coordinator keeps per worker.
struct WorkerChannels {
    job_tx: Sender<Job>,
    rows_rx: Receiver<Vec<u8>>,
}

/// Pool of worker threads computing grid bands.
pub struct WorkerPool {
    /// One job/result channel pair per worker.
    channels: Vec<WorkerChannels>,
    /// Worker thread handles.
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool of `threads` workers.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn a worker thread.
    pub fn spawn(threads: usize) -> Self {
        let mut channels = Vec::with_capacity(threads);
        let mut handles = Vec::with_capacity(threads);

        for i in 0..threads {
            let (job_tx, job_rx) = unbounded::<Job>();
            let (rows_tx, rows_rx) = unbounded::<Vec<u8>>();

            let handle = thread::Builder::new()
                .name(format!("parlife-worker-{i}"))
                .spawn(move || Self::run_loop(&job_rx, &rows_tx))
                .expect("Failed to spawn worker thread");

            channels.push(WorkerChannels { job_tx, rows_rx });
            handles.push(handle);
        }

        debug!("spawned {threads} worker threads");
        Self { channels, handles }
    }

    /// Number of workers in the pool.
    pub fn threads(&self) -> usize {
        self.channels.len()
    }

    /// Run one turn: fan one band out to every worker, block until all
    /// results are in, and reassemble the next generation in band order.
    ///
    /// This is the turn barrier: it returns only once every worker has
    /// completed its band. Results are collected per worker channel, so
    /// the assembled grid does not depend on completion order. A worker
    /// that has died surfaces as [`EngineError::WorkerFailed`].
    ///
    /// # Panics
    ///
    /// Panics if `bands.len()` differs from the pool size; the
    /// partitioner always produces one band per worker.
    pub fn run_turn(&self, snapshot: &Arc<Grid>, bands: &[Band]) -> Result<Grid, EngineError> {
        assert_eq!(
            bands.len(),
            self.channels.len(),
            "band count must match worker count"
        );

        for (band, worker) in bands.iter().zip(&self.channels) {
            let job = Job {
                snapshot: Arc::clone(snapshot),
                band: *band,
            };
            worker.job_tx.send(job).map_err(|_| EngineError::WorkerFailed)?;
        }

        let mut parts = Vec::with_capacity(bands.len());
        for worker in &self.channels {
            let rows = worker
                .rows_rx
                .recv()
                .map_err(|_| EngineError::WorkerFailed)?;
            parts.push(rows);
        }

        Ok(Grid::from_rows(snapshot.width(), snapshot.height(), parts))
    }

    /// Worker loop: compute one band per job until the job channel
    /// closes.
    fn run_loop(job_rx: &Receiver<Job>, rows_tx: &Sender<Vec<u8>>) {
        for job in job_rx.iter() {
            let rows = rules::step_rows(&job.snapshot, job.band.start_y, job.band.end_y);
            if rows_tx.send(rows).is_err() {
                // Coordinator gone, exit
                break;
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Disconnect the job channels so the workers exit their loops.
        self.channels.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
