use std::io::Read;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::{LoadError, StepError};
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random source used by `Cxkk`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - inspecting its frame buffer and timers
///
/// Pacing is up to the caller: every `step` executes exactly one instruction and
/// decrements both timers once.
pub struct Chip8 {
    state: State,
    rng: Box<dyn RngCore>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(Box::new(StdRng::from_entropy()))
    }

    /// Creates a Chip-8 whose `Cxkk` draws bytes from `rng`
    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        Chip8 {
            state: State::new(),
            rng,
        }
    }

    /// Copies a rom into memory at the program start
    ///
    /// # Arguments
    /// * `rom` the raw program image
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        let start = PROGRAM_START as usize;
        let capacity = MEMORY_SIZE - start;
        if rom.len() > capacity {
            return Err(LoadError::RomTooLarge {
                len: rom.len(),
                capacity,
            });
        }
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), start);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<usize, LoadError> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)?;
        Ok(rom.len())
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    /// Sets the key currently held down, or `None` when nothing is held
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key; higher bits are dropped
    pub fn set_pressed_key(&mut self, key: Option<u8>) {
        self.state.pressed_key = key.map(|k| k & 0xF);
    }

    pub fn pressed_key(&self) -> Option<u8> {
        self.state.pressed_key
    }

    /// The register an `Fx0A` is waiting to fill, if the CPU is blocked on input
    pub fn awaiting_key(&self) -> Option<u8> {
        self.state.awaiting_key
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc and moves the pc past it
    /// - decodes and executes it
    /// - decrements the timers
    ///
    /// On a stack fault the pc is put back on the faulting instruction and the timers are
    /// left alone.
    pub fn step(&mut self) -> Result<(), StepError> {
        let pc = self.state.pc;
        let op = Opcode(self.state.word_at(pc));
        trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            pc
        );
        self.state.pc = pc.wrapping_add(0x2);

        let instruction = Instruction::decode(op);
        if let Instruction::Unknown(word) = instruction {
            debug!("ignoring unknown opcode {:04X} at {:#05X}", word, pc);
        }
        if let Err(e) = instruction.execute(&mut self.state, &mut *self.rng) {
            self.state.pc = pc;
            return Err(e);
        }

        self.state.tick_timers();
        Ok(())
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn test_chip8_loads_rom_at_program_start() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x202], [0xAA, 0xBB]);
    }

    #[test]
    fn test_chip8_loads_rom_filling_memory() {
        let mut chip8 = Chip8::new();
        let rom = vec![0x11; 4096 - 0x200];
        chip8.load_rom(&rom).unwrap();
        assert_eq!(chip8.state.memory[0xFFF], 0x11);
    }

    #[test]
    fn test_chip8_rejects_oversized_rom() {
        let mut chip8 = Chip8::new();
        let rom = vec![0x11; 4096 - 0x200 + 1];
        match chip8.load_rom(&rom) {
            Err(LoadError::RomTooLarge { len, capacity }) => {
                assert_eq!(len, 3585);
                assert_eq!(capacity, 3584);
            }
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
        assert_eq!(chip8.state.memory[0x200], 0x0);
    }

    #[test]
    fn test_chip8_loads_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut reader: &[u8] = &[0x60, 0x05];
        assert_eq!(chip8.load_rom_from(&mut reader).unwrap(), 2);
        assert_eq!(chip8.state.memory[0x200..0x202], [0x60, 0x05]);
    }

    #[test]
    fn test_cycles_advance_pc() {
        let mut chip8 = Chip8::new();
        let starting_pc = chip8.state.pc;
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
    }

    #[test]
    fn test_step_decrements_timers() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 2;
        chip8.state.sound_timer = 1;
        chip8.load_rom(&[0x00, 0xE0, 0x00, 0xE0]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.delay_timer(), 1);
        assert_eq!(chip8.sound_timer(), 0);
        chip8.step().unwrap();
        assert_eq!(chip8.delay_timer(), 0);
        assert_eq!(chip8.sound_timer(), 0);
    }

    #[test]
    fn test_failed_step_leaves_pc_on_fault() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 5;
        chip8.load_rom(&[0x00, 0xEE]).unwrap();
        assert_eq!(
            chip8.step(),
            Err(StepError::StackUnderflow { pc: 0x200 })
        );
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.delay_timer(), 5);
    }

    #[test]
    fn test_get_frame_only_after_draw() {
        let mut chip8 = Chip8::new();
        assert!(chip8.get_frame().is_none());
        chip8.load_rom(&[0xD0, 0x01]).unwrap();
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_pressed_key_is_masked() {
        let mut chip8 = Chip8::new();
        chip8.set_pressed_key(Some(0x1A));
        assert_eq!(chip8.pressed_key(), Some(0xA));
        chip8.set_pressed_key(None);
        assert_eq!(chip8.pressed_key(), None);
    }

    #[test]
    fn test_awaits_key_until_pressed() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xF3, 0x0A]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.awaiting_key(), Some(0x3));
        chip8.set_pressed_key(Some(0x9));
        chip8.step().unwrap();
        assert_eq!(chip8.awaiting_key(), None);
        assert_eq!(chip8.state.v[0x3], 0x9);
    }

    #[test]
    fn test_injected_rng_drives_rand() {
        let mut chip8 = Chip8::with_rng(Box::new(StepRng::new(0x5C, 0)));
        chip8.load_rom(&[0xC4, 0xFF]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x4], 0x5C);
    }
}
