//! Small helpers shared between the emulator state and the front end.

pub mod bit;

pub use bit::Bit;
