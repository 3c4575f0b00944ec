pub use display::{frame_to_text, Display};

mod display;
