use crate::errors::LoadProgramError;
use crate::hardware::keyboard::KeyboardInputProvider;
use log::debug;
use std::fmt::{Debug, Formatter};
use std::io;
use std::ops::{Index, IndexMut};
use std::path::Path;

/// Number of addressable `u16` words.
pub const MEMORY_SIZE: usize = 1 << 16;
/// Conventional load and start address of user programs.
pub const PROGRAM_SECTION_START: u16 = 0x3000;

/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(enumn::N, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryMappedIOLocations {
    /// Keyboard Status Register
    Kbsr = 0xFE00,
    /// Keyboard Data Register
    Kbdr = 0xFE02,
}
impl MemoryMappedIOLocations {
    #[must_use]
    pub const fn address(self) -> u16 {
        self as u16
    }
}

/// An abstraction for the LC-3 memory excluding registers.
///
/// Indexing gives raw access without side effects, [`Memory::read`] and [`Memory::write`]
/// are the accesses of a running program.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
    keyboard: Box<dyn KeyboardInputProvider>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().filter(|w| **w != 0).count();
        write!(
            f,
            "Memory {{ non-zero words: {used}, KBSR: {:#06X}, KBDR: {:#06X} }}",
            self[MemoryMappedIOLocations::Kbsr.address()],
            self[MemoryMappedIOLocations::Kbdr.address()]
        )
    }
}
impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, index: u16) -> &Self::Output {
        &self.data[usize::from(index)]
    }
}
impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, index: u16) -> &mut Self::Output {
        &mut self.data[usize::from(index)]
    }
}
impl Memory {
    const KEYBOARD_STATUS_REGISTER_SET: u16 = 1 << 15;
    const KEYBOARD_STATUS_REGISTER_UNSET: u16 = 0;

    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE],
            keyboard,
        }
    }
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Reads a word like a running program does.
    ///
    /// Reading the keyboard status register polls the keyboard first and updates
    /// KBSR and KBDR accordingly.
    ///
    /// # Errors
    /// - polling the keyboard failed
    pub fn read(&mut self, address: u16) -> io::Result<u16> {
        if MemoryMappedIOLocations::n(address) == Some(MemoryMappedIOLocations::Kbsr) {
            self.poll_keyboard()?;
        }
        Ok(self[address])
    }
    /// Writes a word, memory mapped IO locations are not special cased.
    pub fn write(&mut self, address: u16, value: u16) {
        self[address] = value;
    }

    fn poll_keyboard(&mut self) -> io::Result<()> {
        let kbsr = MemoryMappedIOLocations::Kbsr.address();
        if self.keyboard.check_input_available()? {
            let c = self.keyboard.read_character()?;
            debug!("Keyboard poll got character {c:#04X}");
            self[kbsr] = Self::KEYBOARD_STATUS_REGISTER_SET;
            self[MemoryMappedIOLocations::Kbdr.address()] = u16::from(c);
        } else {
            self[kbsr] = Self::KEYBOARD_STATUS_REGISTER_UNSET;
        }
        Ok(())
    }

    /// Blocking read of one character from the keyboard, bypassing KBSR and KBDR.
    ///
    /// # Errors
    /// - the keyboard failed
    pub fn read_character(&mut self) -> io::Result<u8> {
        self.keyboard.read_character()
    }

    /// Loads a program image: a big-endian `.ORIG` word followed by big-endian words
    /// stored from that origin on.
    ///
    /// Returns the origin.
    ///
    /// # Errors
    /// - Program is missing valid .ORIG header (shorter than one `u16` word)
    /// - Program has an odd number of bytes
    /// - Program does not fit between origin and the end of memory
    pub fn load_program(&mut self, image: &[u8]) -> Result<u16, LoadProgramError> {
        let Some((header, rest)) = image.split_first_chunk::<2>() else {
            return Err(LoadProgramError::ProgramMissingOrigHeader {
                actual_bytes: image.len(),
            });
        };
        if rest.len() % 2 != 0 {
            return Err(LoadProgramError::ProgramOddByteCount {
                actual_bytes: image.len(),
            });
        }
        let origin = u16::from_be_bytes(*header);
        let start = usize::from(origin);
        let instruction_count = rest.len() / 2;
        let maximum_instructions = MEMORY_SIZE - start;
        if instruction_count > maximum_instructions {
            return Err(LoadProgramError::ProgramTooLong {
                origin,
                actual_instructions: instruction_count,
                maximum_instructions,
            });
        }
        let program_slice = &mut self.data[start..start + instruction_count];
        for (word, bytes) in program_slice.iter_mut().zip(rest.chunks_exact(2)) {
            *word = u16::from_be_bytes([bytes[0], bytes[1]]);
        }
        debug!("Loaded {instruction_count} words at origin {origin:#06X}");
        Ok(origin)
    }
    /// Reads the program image at `path` and loads it, see [`Memory::load_program`].
    ///
    /// # Errors
    /// - Program image cannot be read
    /// - See [`Memory::load_program`]
    pub fn load_program_file(&mut self, path: impl AsRef<Path>) -> Result<u16, LoadProgramError> {
        let path = path.as_ref();
        let image =
            std::fs::read(path).map_err(|source| LoadProgramError::ProgramUnreadable {
                path: path.display().to_string(),
                source,
            })?;
        self.load_program(&image)
    }
}
