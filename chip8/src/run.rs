use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use chip8_core::Chip8;

/// How a ROM should be run
pub struct Config {
    pub rom: PathBuf,
    /// Instructions per second; ignored when `unpaced`
    pub clock_speed: u64,
    pub cycles: u64,
    /// Chip-8 key held down for the whole session
    pub key: Option<u8>,
    pub unpaced: bool,
    /// Seed for `Cxkk`; entropy when absent
    pub seed: Option<u64>,
}

pub fn run(config: &Config) -> Result<Chip8> {
    let mut chip8 = match config.seed {
        Some(seed) => Chip8::with_rng(Box::new(StdRng::seed_from_u64(seed))),
        None => Chip8::new(),
    };

    // Load ROM
    let file = File::open(&config.rom)
        .with_context(|| format!("unable to open {}", config.rom.display()))?;
    let mut reader = BufReader::new(file);
    let len = chip8
        .load_rom_from(&mut reader)
        .with_context(|| format!("unable to load {}", config.rom.display()))?;
    info!("loaded {} byte ROM from {}", len, config.rom.display());

    chip8.set_pressed_key(config.key);

    // Set initial timing
    let cycle_time = Duration::from_nanos(1_000_000_000 / config.clock_speed.max(1));
    let mut last_cycle = Instant::now();

    for cycle in 0..config.cycles {
        if let Err(e) = chip8.step() {
            warn!("halting after {} cycles: {}", cycle, e);
            break;
        }

        // Handle timing
        if !config.unpaced {
            let elapsed_cycle_time = last_cycle.elapsed();
            if cycle_time > elapsed_cycle_time {
                std::thread::sleep(cycle_time - elapsed_cycle_time);
            }
            last_cycle = Instant::now();
        }
    }

    Ok(chip8)
}
