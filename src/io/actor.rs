//! I/O actor: a dedicated thread owning all filesystem access.
//!
//! The run never touches disk directly; it sends commands here. Loads
//! block on a reply so a bad input fails the run before the first turn.
//! Saves are asynchronous so a mid-run snapshot does not stall the turn
//! loop; any save failure is held and surfaced by the next idle check,
//! which the driver performs before closing the event stream. That is the
//! guarantee that no output is silently lost on shutdown.

use super::pgm;
use crate::error::EngineError;
use crate::grid::Grid;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Commands understood by the I/O thread.
enum IoCommand {
    /// Read an input image; reply with the grid or a fatal error.
    Load {
        filename: String,
        width: usize,
        height: usize,
        reply: Sender<Result<Grid, EngineError>>,
    },

    /// Write a grid snapshot. Processed in order, asynchronously.
    Save { filename: String, grid: Arc<Grid> },

    /// Reply once every previously queued command has completed,
    /// carrying the first deferred save failure if there was one.
    CheckIdle {
        reply: Sender<Result<(), EngineError>>,
    },
}

/// Handle to the I/O collaborator thread.
pub struct IoActor {
    /// Command sender; dropped to shut the thread down.
    cmd_tx: Option<Sender<IoCommand>>,
    /// Handle to the I/O thread.
    handle: Option<JoinHandle<()>>,
}

impl IoActor {
    /// Spawn the I/O thread rooted at `image_dir`.
    ///
    /// Image names are bare (`64x64`, `64x64x12`); the actor adds the
    /// directory and the `.pgm` extension.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the I/O thread.
    pub fn spawn(image_dir: PathBuf) -> Self {
        let (cmd_tx, cmd_rx) = unbounded::<IoCommand>();

        let handle = thread::Builder::new()
            .name("parlife-io".to_string())
            .spawn(move || Self::run_loop(&cmd_rx, &image_dir))
            .expect("Failed to spawn i/o thread");

        Self {
            cmd_tx: Some(cmd_tx),
            handle: Some(handle),
        }
    }

    /// Load an input image, blocking until it is read and validated.
    pub fn load(&self, filename: &str, width: usize, height: usize) -> Result<Grid, EngineError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(IoCommand::Load {
            filename: filename.to_string(),
            width,
            height,
            reply: reply_tx,
        })?;
        reply_rx.recv().map_err(|_| Self::hangup())?
    }

    /// Queue a snapshot write. Returns once the command is accepted, not
    /// once the bytes are on disk; see [`IoActor::check_idle`].
    pub fn save(&self, filename: String, grid: Arc<Grid>) -> Result<(), EngineError> {
        self.send(IoCommand::Save { filename, grid })
    }

    /// Block until every queued command has completed, surfacing any
    /// deferred save failure.
    pub fn check_idle(&self) -> Result<(), EngineError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(IoCommand::CheckIdle { reply: reply_tx })?;
        reply_rx.recv().map_err(|_| Self::hangup())?
    }

    fn send(&self, command: IoCommand) -> Result<(), EngineError> {
        self.cmd_tx
            .as_ref()
            .expect("i/o actor command channel open until drop")
            .send(command)
            .map_err(|_| Self::hangup())
    }

    fn hangup() -> EngineError {
        EngineError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "i/o thread is gone",
        ))
    }

    /// Command loop. Commands are handled strictly in order, so an idle
    /// reply proves every earlier save has hit the filesystem.
    fn run_loop(cmd_rx: &Receiver<IoCommand>, image_dir: &Path) {
        let mut deferred: Option<EngineError> = None;

        for command in cmd_rx.iter() {
            match command {
                IoCommand::Load {
                    filename,
                    width,
                    height,
                    reply,
                } => {
                    let path = image_dir.join(format!("{filename}.pgm"));
                    debug!("loading {}", path.display());
                    let _ = reply.send(pgm::read_pgm(&path, width, height));
                }
                IoCommand::Save { filename, grid } => {
                    let path = image_dir.join(format!("{filename}.pgm"));
                    debug!("saving {}", path.display());
                    if let Err(err) = pgm::write_pgm(&path, &grid) {
                        error!("failed to save {}: {err}", path.display());
                        if deferred.is_none() {
                            deferred = Some(err.into());
                        }
                    }
                }
                IoCommand::CheckIdle { reply } => {
                    let _ = reply.send(deferred.take().map_or(Ok(()), Err));
                }
            }
        }
    }
}

impl Drop for IoActor {
    fn drop(&mut self) {
        drop(self.cmd_tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
