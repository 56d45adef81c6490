//! Interactive demo: drive a run from the keyboard.
//!
//! `p` pauses and resumes, `s` saves a snapshot, `q` saves and quits.
//! The terminal is put in raw mode so key presses arrive immediately;
//! the event stream is rendered as a rolling status line.
//!
//! Usage: `cargo run --example interactive [turns] [threads]`

use crossbeam_channel::unbounded;
use crossterm::terminal;
use parlife::{Event, KeyboardActor, Params, RunConfig, RunState};
use std::io::Write;
use std::time::Duration;

const WIDTH: usize = 64;
const HEIGHT: usize = 64;

fn soup(width: usize, height: usize) -> parlife::Grid {
    let mut grid = parlife::Grid::new(width, height);
    let mut state: u32 = 0x9e37_79b9;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 == 0 {
                grid.set(x, y, parlife::ALIVE);
            }
        }
    }
    grid
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let turns: usize = args.next().map_or(Ok(10_000), |a| a.parse())?;
    let threads: usize = args.next().map_or(Ok(4), |a| a.parse())?;

    let image_dir = std::env::temp_dir().join("parlife-interactive");
    let params = Params::new(turns, threads, WIDTH, HEIGHT);
    parlife::io::pgm::write_pgm(
        &image_dir.join(format!("{WIDTH}x{HEIGHT}.pgm")),
        &soup(WIDTH, HEIGHT),
    )?;

    let mut config = RunConfig::new(params);
    config.image_dir = image_dir.clone();
    config.report_interval = Duration::from_secs(2);

    let (events_tx, events_rx) = unbounded();
    let (control_tx, control_rx) = unbounded();

    terminal::enable_raw_mode()?;
    let keyboard = KeyboardActor::spawn(control_tx, Duration::from_millis(50));
    let handle = parlife::RunHandle::spawn(config, events_tx, control_rx);

    println!("p = pause/resume, s = save, q = save and quit\r");

    let mut stdout = std::io::stdout();
    let mut turn = 0usize;
    for event in &events_rx {
        match event {
            Event::TurnComplete { completed_turns } => turn = completed_turns,
            Event::AliveCellsCount { completed_turns, count } => {
                print!("\rturn {completed_turns:>6}: {count:>5} alive ");
                stdout.flush()?;
            }
            Event::StateChange { new_state, .. } => {
                if new_state == RunState::Paused {
                    print!("\r[paused at turn {turn}]          ");
                } else {
                    print!("\r[running]                        ");
                }
                stdout.flush()?;
            }
            Event::ImageOutputComplete { filename, .. } => {
                println!("\rsaved {} in {}\r", filename, image_dir.display());
            }
            Event::FinalTurnComplete { completed_turns, alive } => {
                println!(
                    "\rfinal: turn {completed_turns}, {} cells alive\r",
                    alive.len()
                );
            }
            Event::CellFlipped { .. } => {}
        }
    }

    let result = handle.join();
    keyboard.join();
    terminal::disable_raw_mode()?;
    result?;
    Ok(())
}
