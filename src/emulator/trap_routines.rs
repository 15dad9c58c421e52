use crate::errors::ExecutionError;
use crate::hardware::memory::{MEMORY_SIZE, Memory};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Trap vectors, the lowest 8 bits of a TRAP instruction.
#[repr(u8)]
#[derive(enumn::N, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrapVector {
    /// get character from keyboard, not echoed onto the terminal
    GetC = 0x20,
    /// output a character
    Out = 0x21,
    /// output a word string
    PutS = 0x22,
    /// get character from keyboard, echoed onto the terminal
    In = 0x23,
    /// output a byte string
    PutSp = 0x24,
    /// halt the program
    Halt = 0x25,
}

const IN_PROMPT: &str = "Input a character: ";
const HALT_MESSAGE: &str = "HALT\n";

fn read_character_from_console(
    regs: &mut Registers,
    mem: &mut Memory,
) -> Result<u8, ExecutionError> {
    let c = mem.read_character()?;
    regs.set(0, u16::from(c));
    Ok(c)
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(regs: &mut Registers, mem: &mut Memory) -> ControlFlow<Result<(), ExecutionError>> {
    match read_character_from_console(regs, mem) {
        Ok(_) => ControlFlow::Continue(()),
        Err(e) => ControlFlow::Break(Err(e)),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    mem: &mut Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_out(IN_PROMPT.as_bytes(), stdout)?;
    match read_character_from_console(regs, mem) {
        Ok(c) => write_out(&[c], stdout),
        Err(e) => ControlFlow::Break(Err(e)),
    }
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_out(&[low_byte(regs.get(0))], stdout)
}

const fn low_byte(word: u16) -> u8 {
    word.to_le_bytes()[0]
}

fn put_one_char_per_u16(input: u16, append_to: &mut Vec<u8>) {
    append_to.push(low_byte(input));
}

fn put_two_chars_per_u16(input: u16, append_to: &mut Vec<u8>) {
    let [first, second] = input.to_le_bytes();
    append_to.push(first);
    if second != 0 {
        append_to.push(second);
    }
}

/// Collects characters from R0's address on up to the first `0x0000` word and writes them
/// followed by a newline.
fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_char: fn(u16, &mut Vec<u8>),
) -> ControlFlow<Result<(), ExecutionError>> {
    let mut address = regs.get(0);
    let mut s = Vec::with_capacity(120);
    // at most one pass over the whole memory if no terminator exists
    for _ in 0..MEMORY_SIZE {
        let word = mem[address];
        if word == 0 {
            break;
        }
        handle_char(word, &mut s);
        address = address.wrapping_add(1);
    }
    s.push(b'\n');
    write_out(&s, stdout)
}

/// PUTS: print null-delimited char* from register 0's address
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and stdout a message
pub fn halt(stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_out(HALT_MESSAGE.as_bytes(), stdout)?;
    ControlFlow::Break(Ok(()))
}

fn write_out(data: &[u8], stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    match stdout.write_all(data).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(e),
    }
}

fn wrap_io_error_in_cf(error: io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::InputOutput(error)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::{FakeKeyboardInputProvider, StringWriter};
    use googletest::prelude::*;

    fn create_memory(stdin: &[u8]) -> Memory {
        Memory::new(Box::new(FakeKeyboardInputProvider::new(stdin)))
    }

    #[gtest]
    pub fn test_trap_vector_decoding() {
        expect_that!(TrapVector::n(0x20), eq(Some(TrapVector::GetC)));
        expect_that!(TrapVector::n(0x25), eq(Some(TrapVector::Halt)));
        expect_that!(TrapVector::n(0x26), eq(None::<TrapVector>));
        expect_that!(TrapVector::n(0x00), eq(None::<TrapVector>));
    }
    #[gtest]
    pub fn test_get_c() {
        let mut mem = create_memory(b"A");
        let mut regs = Registers::new();
        let res = get_c(&mut regs, &mut mem);
        assert!(res.is_continue());
        expect_that!(regs.get(0), eq(u16::from(b'A')));
    }
    #[gtest]
    pub fn test_get_c_read_error() {
        let mut mem = Memory::new(Box::new(FakeKeyboardInputProvider::with_error(
            "Error during read",
        )));
        let mut regs = Registers::new();
        let res = get_c(&mut regs, &mut mem);
        assert!(res.is_break());
        let execution_error = res.break_value().unwrap().unwrap_err();
        assert_that!(
            execution_error.to_string(),
            eq("Error during reading Stdin or writing program output to Stdout: Error during read")
        );
    }
    #[gtest]
    pub fn test_in() {
        let mut mem = create_memory(b"A");
        let mut regs = Registers::new();
        let mut writer = StringWriter::new();
        let res = in_trap(&mut regs, &mut mem, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("Input a character: A"));
        assert_that!(regs.get(0), eq(u16::from(b'A')));
    }
    #[gtest]
    pub fn test_out() {
        let mut regs = Registers::new();
        let mut writer = StringWriter::new();
        // high byte is ignored
        regs.set(0, 0x7F00 | u16::from(b'k'));
        let res = out(&regs, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("k"));
    }
    #[gtest]
    pub fn test_out_write_error() {
        let regs = Registers::new();
        let mut writer = StringWriter::failing();
        let res = out(&regs, &mut writer);
        assert!(matches!(
            res,
            ControlFlow::Break(Err(ExecutionError::InputOutput(_)))
        ));
    }
    #[gtest]
    pub fn test_put_s() {
        let mut mem = create_memory(b"");
        for (address, c) in [(0x3010, b'A'), (0x3011, b'A'), (0x3012, b'A')] {
            mem.write(address, u16::from(c));
        }
        mem.write(0x3013, 0x0000);
        let mut regs = Registers::new();
        regs.set(0, 0x3010);
        let mut writer = StringWriter::new();
        let res = put_s(&regs, &mem, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("AAA\n"));
    }
    #[gtest]
    pub fn test_put_s_empty_string() {
        let mem = create_memory(b"");
        let mut regs = Registers::new();
        regs.set(0, 0x3010);
        let mut writer = StringWriter::new();
        let res = put_s(&regs, &mem, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("\n"));
    }
    #[gtest]
    pub fn test_put_sp() {
        let data = [
            0x6548u16, 0x6c6c, 0x206f, 0x6f57, 0x6c72, 0x2164, 0x0000,
        ];
        let mut mem = create_memory(b"");
        for (address, word) in (0x3005u16..).zip(data) {
            mem.write(address, word);
        }
        let mut regs = Registers::new();
        regs.set(0, 0x3005);
        let mut writer = StringWriter::new();
        let res = put_sp(&regs, &mem, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("Hello World!\n"));
    }
    #[gtest]
    pub fn test_put_sp_odd_length() {
        let mut mem = create_memory(b"");
        mem.write(0x3010, 0x4142);
        mem.write(0x3011, 0x0043);
        let mut regs = Registers::new();
        regs.set(0, 0x3010);
        let mut writer = StringWriter::new();
        let res = put_sp(&regs, &mem, &mut writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("BAC\n"));
    }
    #[yare::parameterized(
        puts = { put_s, u16::from(b'A'), "A" },
        putsp = { put_sp, 0x4241, "AB" },
    )]
    fn test_put_without_terminator_stops_after_one_pass(
        routine: fn(&Registers, &Memory, &mut StringWriter) -> ControlFlow<Result<(), ExecutionError>>,
        word: u16,
        chars_per_word: &str,
    ) {
        let mut mem = create_memory(b"");
        for address in 0..=u16::MAX {
            mem[address] = word;
        }
        let mut regs = Registers::new();
        regs.set(0, 0x3000);
        let mut writer = StringWriter::new();
        assert!(routine(&regs, &mem, &mut writer).is_continue());
        let expected = chars_per_word.repeat(MEMORY_SIZE) + "\n";
        assert_that!(writer.get_string(), eq(&expected));
    }
    #[gtest]
    pub fn test_halt() {
        let mut writer = StringWriter::new();
        let res = halt(&mut writer);
        assert_that!(res.break_value().map(|r| r.is_ok()), eq(Some(true)));
        assert_that!(writer.get_string(), eq("HALT\n"));
    }
}
