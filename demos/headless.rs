//! Headless demo: run a fixed number of turns and summarize the stream.
//!
//! Generates a deterministic random-soup input image, runs the engine
//! with no control source attached, and prints one line per turn plus
//! the final census.
//!
//! Usage: `cargo run --example headless [turns] [threads]`

use crossbeam_channel::unbounded;
use parlife::{Event, Params, RunConfig};
use std::time::Duration;

const WIDTH: usize = 64;
const HEIGHT: usize = 64;

/// Deterministic soup: a small xorshift over the cell index.
fn soup(width: usize, height: usize) -> parlife::Grid {
    let mut grid = parlife::Grid::new(width, height);
    let mut state: u32 = 0x2545_f491;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 4 == 0 {
                grid.set(x, y, parlife::ALIVE);
            }
        }
    }
    grid
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let turns: usize = args.next().map_or(Ok(100), |a| a.parse())?;
    let threads: usize = args.next().map_or(Ok(4), |a| a.parse())?;

    let image_dir = std::env::temp_dir().join("parlife-headless");
    let params = Params::new(turns, threads, WIDTH, HEIGHT);

    let initial = soup(WIDTH, HEIGHT);
    parlife::io::pgm::write_pgm(
        &image_dir.join(format!("{WIDTH}x{HEIGHT}.pgm")),
        &initial,
    )?;
    println!(
        "{WIDTH}x{HEIGHT} soup, {} cells alive, {turns} turns on {threads} threads",
        initial.alive_count()
    );

    let mut config = RunConfig::new(params);
    config.image_dir = image_dir;
    config.report_interval = Duration::from_secs(1);

    let (events_tx, events_rx) = unbounded();
    // No control source: drop the sender so polls always come up empty.
    let (control_tx, control_rx) = unbounded();
    drop(control_tx);

    let handle = parlife::RunHandle::spawn(config, events_tx, control_rx);

    let mut flips = 0usize;
    for event in events_rx {
        match event {
            Event::CellFlipped { .. } => flips += 1,
            Event::TurnComplete { completed_turns } => {
                println!("turn {completed_turns:>4}: {flips} flips");
                flips = 0;
            }
            Event::AliveCellsCount { completed_turns, count } => {
                println!("          (turn {completed_turns}: {count} alive)");
            }
            Event::FinalTurnComplete { completed_turns, alive } => {
                println!(
                    "done: turn {completed_turns}, {} cells alive",
                    alive.len()
                );
            }
            other => println!("{other}"),
        }
    }

    handle.join()?;
    Ok(())
}
