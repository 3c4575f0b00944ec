use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use chip8_core::CLOCK_SPEED;
use chip8_display::Display;
use keymap::keymap;
use run::{run, Config};

mod keymap;
mod run;

/// Runs a Chip-8 ROM headlessly and prints the final frame
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    clock_speed: u64,

    /// Number of instructions to execute
    #[arg(long, default_value_t = 1000)]
    cycles: u64,

    /// Keyboard key (QWERTY layout) held down for the whole run
    #[arg(long)]
    key: Option<char>,

    /// Run as fast as possible instead of at the clock speed
    #[arg(long)]
    unpaced: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let key = match args.key {
        Some(c) => Some(keymap(c).ok_or_else(|| anyhow!("'{}' is not mapped to a Chip-8 key", c))?),
        None => None,
    };
    let config = Config {
        rom: args.rom,
        clock_speed: args.clock_speed,
        cycles: args.cycles,
        key,
        unpaced: args.unpaced,
        seed: args.seed,
    };

    let chip8 = run(&config)?;
    Display::new(io::stdout().lock()).render(chip8.frame_buffer())?;
    Ok(())
}
