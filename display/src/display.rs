use std::io::{self, Write};

use chip8_core::FrameBuffer;

const LIT: char = '#';
const DARK: char = '.';

/// Formats a Chip-8 FrameBuffer as text.
///
/// Each row of the frame becomes one line, with `#` for lit pixels and `.` for dark ones.
///
/// # Arguments
/// * `frame` a Chip-8 FrameBuffer
pub fn frame_to_text(frame: &FrameBuffer) -> String {
    frame
        .iter()
        .map(|row| {
            row.iter()
                .map(|&lit| if lit { LIT } else { DARK })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// This renders frames as text to any writer, e.g. a terminal.
pub struct Display<W: Write> {
    out: W,
}

impl<W: Write> Display<W> {
    pub fn new(out: W) -> Self {
        Display { out }
    }

    /// Writes the frame followed by a newline.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        writeln!(self.out, "{}", frame_to_text(frame))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
