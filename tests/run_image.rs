use googletest::prelude::*;
use lc3_vm::emulator::{Emulator, MachineState};
use lc3_vm::errors::LoadProgramError;
use lc3_vm::hardware::KeyboardInputProvider;
use std::collections::VecDeque;
use std::io;

struct ScriptedKeyboard(VecDeque<u8>);

impl KeyboardInputProvider for ScriptedKeyboard {
    fn check_input_available(&mut self) -> io::Result<bool> {
        Ok(!self.0.is_empty())
    }
    fn read_character(&mut self) -> io::Result<u8> {
        self.0
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

fn emulator(input: &[u8]) -> Emulator<Vec<u8>> {
    Emulator::new(
        Box::new(ScriptedKeyboard(input.iter().copied().collect())),
        Vec::new(),
    )
}

fn image(words: &[u16]) -> Vec<u8> {
    words.iter().copied().flat_map(u16::to_be_bytes).collect()
}

#[gtest]
fn test_load_image_file_and_run() {
    // .ORIG x3000, LEA R0, #2, PUTSP, HALT, "Hi!" packed
    let program = image(&[0x3000, 0xE002, 0xF024, 0xF025, 0x6948, 0x0021, 0x0000]);
    let path = std::env::temp_dir().join(format!("lc3_vm_putsp_{}.obj", std::process::id()));
    std::fs::write(&path, program).unwrap();

    let mut emu = emulator(b"");
    let origin = emu.load_program_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    expect_that!(origin, eq(0x3000));
    expect_that!(emu.memory()[0x3003], eq(0x6948));

    emu.execute().unwrap();
    expect_that!(String::from_utf8_lossy(emu.stdout()), eq("Hi!\nHALT\n"));
    expect_that!(emu.state(), eq(MachineState::Halted));
}

#[gtest]
fn test_missing_image_file() {
    let mut emu = emulator(b"");
    let error = emu
        .load_program_file("no/such/image.obj")
        .unwrap_err();
    assert!(matches!(error, LoadProgramError::ProgramUnreadable { .. }));
}

#[gtest]
fn test_program_can_overwrite_keyboard_registers() {
    let program = image(&[
        0x3000,
        0b1011_000_000000011, // STI R0, #3 -> KBDR
        0b1010_001_000000010, // LDI R1, #2 <- KBDR
        0xF025,               // HALT
        0xFE02,
        0xFE02,
    ]);
    let mut emu = emulator(b"");
    emu.load_program(&program).unwrap();
    emu.registers_mut().set(0, 0x00AA);
    emu.execute().unwrap();
    expect_that!(emu.registers().get(1), eq(0x00AA));
    expect_that!(emu.memory()[0xFE02], eq(0x00AA));
}

#[gtest]
fn test_read_keyboard_by_polling_and_echo() {
    let program = image(&[
        0x3000,
        0b1010_001_000000101, // 0x3000 LDI R1, KBSR_PTR
        0b0000_011_111111110, // 0x3001 BRzp #-2
        0b1010_000_000000100, // 0x3002 LDI R0, KBDR_PTR
        0xF021,               // 0x3003 OUT
        0xF025,               // 0x3004 HALT
        0x0000,               // 0x3005
        0xFE00,               // 0x3006 KBSR_PTR
        0xFE02,               // 0x3007 KBDR_PTR
    ]);
    let mut emu = emulator(b"z");
    emu.load_program(&program).unwrap();
    emu.execute().unwrap();
    expect_that!(emu.registers().get(0), eq(u16::from(b'z')));
    expect_that!(String::from_utf8_lossy(emu.stdout()), eq("zHALT\n"));
}
