use crate::emulator::Emulator;
use crate::hardware::keyboard::KeyboardInputProvider;
use std::collections::VecDeque;
use std::io;
use std::io::Write;

/// Keyboard replaying a fixed input, or failing on every access.
pub struct FakeKeyboardInputProvider {
    input: VecDeque<u8>,
    error: Option<&'static str>,
}
impl FakeKeyboardInputProvider {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            error: None,
        }
    }
    pub fn with_error(message: &'static str) -> Self {
        Self {
            input: VecDeque::new(),
            error: Some(message),
        }
    }
    fn fail_if_broken(&self) -> io::Result<()> {
        self.error.map_or(Ok(()), |message| Err(io::Error::other(message)))
    }
}
impl KeyboardInputProvider for FakeKeyboardInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        self.fail_if_broken()?;
        Ok(!self.input.is_empty())
    }
    fn read_character(&mut self) -> io::Result<u8> {
        self.fail_if_broken()?;
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "No input available"))
    }
}

pub struct StringWriter {
    vec: Vec<u8>,
    failing: bool,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        if self.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
        }
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self {
            vec,
            failing: false,
        }
    }
    pub fn failing() -> Self {
        Self {
            vec: Vec::new(),
            failing: true,
        }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Emulator with `program` loaded at `0x3000`, a keyboard replaying `stdin` and
/// output captured in a [`StringWriter`].
pub fn fake_emulator(program: &[u16], stdin: &[u8]) -> Emulator<StringWriter> {
    let mut emu = Emulator::new(
        Box::new(FakeKeyboardInputProvider::new(stdin)),
        StringWriter::new(),
    );
    let image: Vec<u8> = std::iter::once(0x3000u16)
        .chain(program.iter().copied())
        .flat_map(u16::to_be_bytes)
        .collect();
    emu.load_program(&image).unwrap();
    emu
}
