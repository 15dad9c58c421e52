use displaydoc::Display;
use std::io;
use thiserror::Error;

/// Errors while framing a program image into memory.
#[derive(Debug, Display, Error)]
pub enum LoadProgramError {
    /// Could not read program image `{path}`: {source}
    ProgramUnreadable { path: String, source: io::Error },
    /// Program is missing valid .ORIG header, got {actual_bytes} bytes while minimum is 2
    ProgramMissingOrigHeader { actual_bytes: usize },
    /// Program has an odd number of bytes: {actual_bytes}, every instruction takes 2 bytes
    ProgramOddByteCount { actual_bytes: usize },
    /// Program too long, got {actual_instructions} u16 instructions at origin {origin:#06X} while limit is {maximum_instructions}
    ProgramTooLong {
        origin: u16,
        actual_instructions: usize,
        maximum_instructions: usize,
    },
}

/// Errors stopping the fetch-execute loop.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// Bad opcode {opcode:#06b} in instruction {instruction:#06X} at address {address:#06X}
    UnknownOpcode {
        opcode: u8,
        instruction: u16,
        address: u16,
    },
    /// Error during reading Stdin or writing program output to Stdout: {0}
    InputOutput(#[from] io::Error),
}
