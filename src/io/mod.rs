//! Image I/O: the run's only connection to persistent storage.
//!
//! A single [`IoActor`] thread owns all filesystem access and is driven
//! over a command channel; the PGM codec underneath it converts between
//! grids and byte streams. The engine itself never opens a file.

mod actor;
pub mod pgm;

pub use actor::IoActor;
