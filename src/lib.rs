//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` runs program images of the LC-3 system.
//! Usage starts with loading a program via `emulator::Emulator::load_program` and running
//! it with `emulator::Emulator::execute`.
//!
//!  # Example
//! ```
//! use lc3_vm::emulator::Emulator;
//! use lc3_vm::hardware::TerminalInputProvider;
//! let mut emu = Emulator::new(Box::new(TerminalInputProvider::new()), Vec::new());
//! // .ORIG x3000, ADD R0, R0, #7, HALT
//! emu.load_program(&[0x30, 0x00, 0x10, 0x27, 0xF0, 0x25]).unwrap();
//! emu.execute().unwrap();
//! assert_eq!(emu.registers().get(0), 7);
//! assert_eq!(emu.stdout().as_slice(), b"HALT\n");
//! ```
//! # Errors
//! - Program is missing valid .ORIG header, has an odd number of bytes or is too long
//! - Program contains an instruction that fails to decode
//! - Reading from the keyboard or writing to the console failed

pub mod emulator;
pub mod errors;
pub mod hardware;
pub(crate) mod numbers;
pub mod terminal;
