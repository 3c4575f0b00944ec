/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded into memory and where the program counter starts
pub const PROGRAM_START: u16 = 0x200;

/// Where the sprite sheet is installed
pub const FONT_START: u16 = 0x050;

/// Each hex digit sprite is 5 bytes tall
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Default CPU frequency in Hz used by drivers that pace execution
pub const CLOCK_SPEED: u64 = 500;

/// # Sprite sheet
/// Sprites for the hex digits 0..F, each 8 bits wide and 5 bytes tall.
///
/// ```text
/// 0xF0  ####....
/// 0x90  #..#....
/// 0x90  #..#....
/// 0x90  #..#....
/// 0xF0  ####....
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
