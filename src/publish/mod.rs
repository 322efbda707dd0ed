//! Publishing staged artifacts to the display's output folder.

pub mod mover;

pub use mover::{move_file, Publisher};
