use clap::Parser;
use lc3_vm::emulator::Emulator;
use lc3_vm::hardware::TerminalInputProvider;
use lc3_vm::terminal::{ConsoleWriter, set_terminal_raw};
use std::error::Error;
use std::io::{IsTerminal, stdout};
use std::path::PathBuf;

/// Runs an LC-3 program image until it halts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Program image: big-endian u16 words, the first one is the load address
    image: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let lock = set_terminal_raw(stdout());
    // raw mode can be on for the keyboard while output is redirected
    let raw_output = lock.is_enabled() && stdout().is_terminal();
    let mut emu = Emulator::new(
        Box::new(TerminalInputProvider::new()),
        ConsoleWriter::new(stdout(), raw_output),
    );
    emu.load_program_file(&cli.image)?;
    emu.execute()?;
    Ok(())
}
