use std::fmt;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, fetched big-endian from two consecutive bytes.
/// Their behavior is cased on some combination of:
/// - `[n, _, _, _]` broad categorization; applies to all opcodes
/// - `[_, _, _, n]` specific behavior within a category
/// - `[_, _, n, n]` more specific behavior within a category
/// - `[_, n, n, n]` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `[_, n, n, n]` a 12-bit address
/// - `[_, _, n, n]` an 8-bit immediate assigned to and/or compared with Vx
/// - `[_, n, _, _]` refers either to the register Vx or a range of registers V0..=Vx
/// - `[_, _, n, _]` refers to the register Vy
///
/// Splitting is total: every one of the 65536 words has nibbles, an address and an immediate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// The four nibbles, most significant first.
    pub fn nibbles(self) -> [u8; 4] {
        [
            ((self.0 & 0xF000) >> 12) as u8,
            self.x(),
            self.y(),
            self.n(),
        ]
    }

    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode(word)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
