use lc3_vm::emulator::Emulator;
use lc3_vm::hardware::TerminalInputProvider;
use std::error::Error;

/// `.ORIG x3000`, `LEA R0, HELLO`, `PUTS`, `HALT`, `HELLO .STRINGZ "Hello World!"`
fn hello_world_image() -> Vec<u8> {
    let mut words = vec![0x3000u16, 0xE002, 0xF022, 0xF025];
    words.extend("Hello World!".bytes().map(u16::from));
    words.push(0);
    words.into_iter().flat_map(u16::to_be_bytes).collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut emu = Emulator::new(Box::new(TerminalInputProvider::new()), std::io::stdout());
    emu.load_program(&hello_world_image())?;
    emu.execute()?;
    Ok(())
}
