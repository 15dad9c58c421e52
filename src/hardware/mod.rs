//! The LC-3 hardware: memory with memory mapped keyboard, registers and the keyboard itself.
pub mod keyboard;
pub mod memory;
pub mod registers;

pub use keyboard::{KeyboardInputProvider, TerminalInputProvider};
pub use memory::Memory;
pub use registers::{ConditionFlag, Registers};
