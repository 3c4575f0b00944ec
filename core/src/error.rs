use thiserror::Error;

/// Errors surfaced while loading a ROM into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("ROM is {len} bytes but only {capacity} bytes fit above the program start")]
    RomTooLarge { len: usize, capacity: usize },
    #[error("unable to read ROM")]
    Io(#[from] std::io::Error),
}

/// Fatal program faults raised while executing an instruction.
///
/// `pc` is the address of the offending instruction.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum StepError {
    #[error("stack overflow calling a subroutine at {pc:#05X}")]
    StackOverflow { pc: u16 },
    #[error("stack underflow returning from a subroutine at {pc:#05X}")]
    StackUnderflow { pc: u16 },
}
