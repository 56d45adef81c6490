//! PGM codec: binary (P5) images holding grid snapshots.
//!
//! The on-disk contract is strict: maxval 255 and pixel values of
//! exactly 0 or 255, one byte per cell in row-major order. Anything else
//! is rejected rather than coerced, so a corrupt image can never become
//! a half-alive grid.

use crate::error::EngineError;
use crate::grid::{Grid, ALIVE, DEAD};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a grid from a binary PGM file, validating dimensions.
pub fn read_pgm(path: &Path, width: usize, height: usize) -> Result<Grid, EngineError> {
    let bytes = fs::read(path)?;
    let mut pos = 0;

    let magic = token(&bytes, &mut pos);
    if magic != Some(b"P5".to_vec()) {
        return Err(EngineError::BadImage(format!(
            "{}: not a binary PGM",
            path.display()
        )));
    }

    let file_width = number(&bytes, &mut pos, path, "width")?;
    let file_height = number(&bytes, &mut pos, path, "height")?;
    let maxval = number(&bytes, &mut pos, path, "maxval")?;

    if (file_width, file_height) != (width, height) {
        return Err(EngineError::BadImage(format!(
            "{}: is {file_width}x{file_height}, expected {width}x{height}",
            path.display()
        )));
    }
    if maxval != 255 {
        return Err(EngineError::BadImage(format!(
            "{}: maxval {maxval}, expected 255",
            path.display()
        )));
    }

    // Exactly one whitespace byte separates the header from the raster.
    pos += 1;
    let raster = bytes.get(pos..pos + width * height).ok_or_else(|| {
        EngineError::BadImage(format!("{}: truncated raster", path.display()))
    })?;
    if let Some(bad) = raster.iter().find(|&&b| b != ALIVE && b != DEAD) {
        return Err(EngineError::BadImage(format!(
            "{}: cell value {bad}, expected 0 or 255",
            path.display()
        )));
    }

    Ok(Grid::from_cells(width, height, raster.to_vec()))
}

/// Write a grid to a binary PGM file, creating parent directories as
/// needed.
pub fn write_pgm(path: &Path, grid: &Grid) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = Vec::with_capacity(grid.cells().len() + 32);
    write!(out, "P5\n{} {}\n255\n", grid.width(), grid.height())?;
    out.extend_from_slice(grid.cells());
    fs::write(path, out)
}

/// Read the next whitespace-delimited header token, skipping `#`
/// comments.
fn token(bytes: &[u8], pos: &mut usize) -> Option<Vec<u8>> {
    while *pos < bytes.len() {
        let b = bytes[*pos];
        if b == b'#' {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
        } else if b.is_ascii_whitespace() {
            *pos += 1;
        } else {
            break;
        }
    }

    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    (*pos > start).then(|| bytes[start..*pos].to_vec())
}

fn number(
    bytes: &[u8],
    pos: &mut usize,
    path: &Path,
    field: &str,
) -> Result<usize, EngineError> {
    token(bytes, pos)
        .and_then(|t| String::from_utf8(t).ok())
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| {
            EngineError::BadImage(format!("{}: unreadable {field}", path.display()))
        })
}
