use rand::RngCore;

use crate::error::StepError;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction.
///
/// Register operands are already widened to indices into `State::v`.
/// Words that match no known shape decode to `Unknown`, which executes as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clr,
    /// 00EE
    Rts,
    /// 0nnn, a machine code routine on the original hardware; ignored
    Sys { addr: u16 },
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    Ske { x: usize, kk: u8 },
    /// 4xkk
    Skne { x: usize, kk: u8 },
    /// 5xy0
    Skre { x: usize, y: usize },
    /// 6xkk
    Load { x: usize, kk: u8 },
    /// 7xkk
    Add { x: usize, kk: u8 },
    /// 8xy0
    Mv { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    Addc { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6, Vy is ignored
    Shr { x: usize },
    /// 8xy7
    Subn { x: usize, y: usize },
    /// 8xyE, Vy is ignored
    Shl { x: usize },
    /// 9xy0
    Skrne { x: usize, y: usize },
    /// Annn
    Loadi { addr: u16 },
    /// Bnnn
    Jumpi { addr: u16 },
    /// Cxkk
    Rand { x: usize, kk: u8 },
    /// Dxyn
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E
    Skpr { x: usize },
    /// ExA1
    Skup { x: usize },
    /// Fx07
    Moved { x: usize },
    /// Fx0A
    Keyd { x: usize },
    /// Fx15
    Loadd { x: usize },
    /// Fx18
    Loadst { x: usize },
    /// Fx1E
    Addi { x: usize },
    /// Fx29
    Ldspr { x: usize },
    /// Fx33
    Bcd { x: usize },
    /// Fx55
    Stor { x: usize },
    /// Fx65
    Read { x: usize },
    Unknown(u16),
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode
    pub fn decode(op: Opcode) -> Self {
        use Instruction::*;

        let x = op.x() as usize;
        let y = op.y() as usize;
        let kk = op.kk();
        let addr = op.addr();

        match op.nibbles() {
            [0x0, 0x0, 0xE, 0x0] => Clr,
            [0x0, 0x0, 0xE, 0xE] => Rts,
            [0x0, ..] => Sys { addr },
            [0x1, ..] => Jump { addr },
            [0x2, ..] => Call { addr },
            [0x3, ..] => Ske { x, kk },
            [0x4, ..] => Skne { x, kk },
            [0x5, .., 0x0] => Skre { x, y },
            [0x6, ..] => Load { x, kk },
            [0x7, ..] => Add { x, kk },
            [0x8, .., 0x0] => Mv { x, y },
            [0x8, .., 0x1] => Or { x, y },
            [0x8, .., 0x2] => And { x, y },
            [0x8, .., 0x3] => Xor { x, y },
            [0x8, .., 0x4] => Addc { x, y },
            [0x8, .., 0x5] => Sub { x, y },
            [0x8, .., 0x6] => Shr { x },
            [0x8, .., 0x7] => Subn { x, y },
            [0x8, .., 0xE] => Shl { x },
            [0x9, .., 0x0] => Skrne { x, y },
            [0xA, ..] => Loadi { addr },
            [0xB, ..] => Jumpi { addr },
            [0xC, ..] => Rand { x, kk },
            [0xD, .., n] => Draw { x, y, n },
            [0xE, _, 0x9, 0xE] => Skpr { x },
            [0xE, _, 0xA, 0x1] => Skup { x },
            [0xF, _, 0x0, 0x7] => Moved { x },
            [0xF, _, 0x0, 0xA] => Keyd { x },
            [0xF, _, 0x1, 0x5] => Loadd { x },
            [0xF, _, 0x1, 0x8] => Loadst { x },
            [0xF, _, 0x1, 0xE] => Addi { x },
            [0xF, _, 0x2, 0x9] => Ldspr { x },
            [0xF, _, 0x3, 0x3] => Bcd { x },
            [0xF, _, 0x5, 0x5] => Stor { x },
            [0xF, _, 0x6, 0x5] => Read { x },
            _ => Unknown(op.0),
        }
    }

    /// Applies the instruction to `state`.
    ///
    /// Expects `state.pc` to already point past the instruction.
    pub fn execute(self, state: &mut State, rng: &mut dyn RngCore) -> Result<(), StepError> {
        use Instruction::*;

        match self {
            Clr => clr(state),
            Rts => rts(state)?,
            Sys { .. } => {}
            Jump { addr } => jump(state, addr),
            Call { addr } => call(state, addr)?,
            Ske { x, kk } => ske(state, x, kk),
            Skne { x, kk } => skne(state, x, kk),
            Skre { x, y } => skre(state, x, y),
            Load { x, kk } => load(state, x, kk),
            Add { x, kk } => add(state, x, kk),
            Mv { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            Addc { x, y } => addc(state, x, y),
            Sub { x, y } => sub(state, x, y),
            Shr { x } => shr(state, x),
            Subn { x, y } => subn(state, x, y),
            Shl { x } => shl(state, x),
            Skrne { x, y } => skrne(state, x, y),
            Loadi { addr } => loadi(state, addr),
            Jumpi { addr } => jumpi(state, addr),
            Rand { x, kk } => rand(state, rng, x, kk),
            Draw { x, y, n } => draw(state, x, y, n),
            Skpr { x } => skpr(state, x),
            Skup { x } => skup(state, x),
            Moved { x } => moved(state, x),
            Keyd { x } => keyd(state, x),
            Loadd { x } => loadd(state, x),
            Loadst { x } => loadst(state, x),
            Addi { x } => addi(state, x),
            Ldspr { x } => ldspr(state, x),
            Bcd { x } => bcd(state, x),
            Stor { x } => stor(state, x),
            Read { x } => read(state, x),
            Unknown(_) => {}
        }
        Ok(())
    }
}
