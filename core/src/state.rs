use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
    STACK_SIZE,
};

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the flags output of arithmetic, shifts and draws
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack (0..=16)
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - Both are decremented once per executed instruction while positive
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - 0x200.. holds the loaded ROM
/// - 64x32 frame buffer
///
/// ## Input
/// - the key currently held down, if any
/// - the register awaiting a key press, while `Fx0A` blocks
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_key: Option<u8>,
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_key: None,
            awaiting_key: None,
        }
    }

    /// The flags register
    pub fn vf(&self) -> u8 {
        self.v[0xF]
    }

    pub fn set_vf(&mut self, flag: bool) {
        self.v[0xF] = u8::from(flag);
    }

    /// Reads a byte; addresses wrap around the 4K address space.
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize % MEMORY_SIZE] = value;
    }

    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn word_at(&self, addr: u16) -> u16 {
        u16::from(self.read(addr)) << 8 | u16::from(self.read(addr.wrapping_add(1)))
    }

    /// Pushes a return address, returning false if the stack is full.
    pub fn push(&mut self, addr: u16) -> bool {
        if self.sp as usize >= STACK_SIZE {
            return false;
        }
        self.stack[self.sp as usize] = addr;
        self.sp += 1;
        true
    }

    /// Pops the most recent return address, if there is one.
    pub fn pop(&mut self) -> Option<u16> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.stack[self.sp as usize])
    }

    /// Decrements both timers toward zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
