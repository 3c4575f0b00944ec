pub use chip8::Chip8;
pub use constants::CLOCK_SPEED;
pub use error::{LoadError, StepError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
