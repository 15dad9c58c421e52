//! The LC-3 CPU: fetch, decode and execute of instructions and trap routines.
mod instruction;
mod opcodes;
#[cfg(test)]
pub(crate) mod test_helpers;
mod trap_routines;

pub use instruction::{Instruction, Opcode};
pub use trap_routines::TrapVector;

use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::keyboard::KeyboardInputProvider;
use crate::hardware::memory::{Memory, PROGRAM_SECTION_START};
use crate::hardware::registers::Registers;
use log::{error, info, trace, warn};
use std::io;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;

/// Default address execution starts at.
pub const PC_START: u16 = PROGRAM_SECTION_START;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MachineState {
    Running,
    Halted,
}

/// The public facing emulator used to run LC-3 programs.
///
/// Keyboard input comes from the [`KeyboardInputProvider`] owned by memory, console output
/// goes to `W`.
#[derive(Debug)]
pub struct Emulator<W: Write> {
    registers: Registers,
    memory: Memory,
    stdout: W,
    state: MachineState,
}

impl<W: Write> Emulator<W> {
    /// Creates a halted machine with zeroed registers and memory.
    #[must_use]
    pub fn new(keyboard: Box<dyn KeyboardInputProvider>, stdout: W) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(keyboard),
            stdout,
            state: MachineState::Halted,
        }
    }

    /// Loads a program image, see [`Memory::load_program`].
    ///
    /// # Errors
    /// - See [`Memory::load_program`]
    pub fn load_program(&mut self, image: &[u8]) -> Result<u16, LoadProgramError> {
        self.memory.load_program(image)
    }
    /// Loads a program image file, see [`Memory::load_program_file`].
    ///
    /// # Errors
    /// - See [`Memory::load_program_file`]
    pub fn load_program_file(&mut self, path: impl AsRef<Path>) -> Result<u16, LoadProgramError> {
        self.memory.load_program_file(path)
    }

    /// Runs from [`PC_START`] until HALT.
    ///
    /// # Errors
    /// - See [`Emulator::execute_from`]
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        self.execute_from(PC_START)
    }
    /// Runs from `start` until HALT or a fatal error, the machine is halted afterwards
    /// in both cases.
    ///
    /// # Errors
    /// - Unknown opcode
    /// - Reading from keyboard or writing to stdout failed
    pub fn execute_from(&mut self, start: u16) -> Result<(), ExecutionError> {
        info!("Starting execution at {start:#06X}");
        self.registers.set_pc(start);
        self.state = MachineState::Running;
        loop {
            if let ControlFlow::Break(result) = self.step() {
                if let Err(e) = &result {
                    error!("Execution stopped: {e}");
                } else {
                    info!("Execution halted at {:#06X}", self.registers.pc());
                }
                return result;
            }
        }
    }

    /// Executes one instruction of a running machine and halts it on any break.
    ///
    /// Breaks with `Ok` on HALT and with `Err` on fatal errors. A halted machine does not
    /// execute anything.
    fn step(&mut self) -> ControlFlow<Result<(), ExecutionError>> {
        if self.state == MachineState::Halted {
            return ControlFlow::Break(Ok(()));
        }
        let flow = self.execute_next_instruction();
        if flow.is_break() {
            self.state = MachineState::Halted;
        }
        flow
    }

    /// Fetches, decodes and executes the instruction at PC.
    ///
    /// PC is incremented before execution, also for instructions failing to decode.
    fn execute_next_instruction(&mut self) -> ControlFlow<Result<(), ExecutionError>> {
        let address = self.registers.pc();
        let instruction = match self.memory.read(address) {
            Ok(bits) => Instruction::from(bits),
            Err(e) => return ControlFlow::Break(Err(e.into())),
        };
        // no wraparound past the top of the address space
        self.registers.set_pc(address.saturating_add(1));
        trace!("{address:#06X}: {instruction:?}");

        let Some(op_code) = Opcode::n(instruction.op_code()) else {
            return ControlFlow::Break(Err(ExecutionError::UnknownOpcode {
                opcode: instruction.op_code(),
                instruction: instruction.bits(),
                address,
            }));
        };
        let regs = &mut self.registers;
        let mem = &mut self.memory;
        let result: io::Result<()> = match op_code {
            Opcode::Add => {
                opcodes::add(instruction, regs);
                Ok(())
            }
            Opcode::And => {
                opcodes::and(instruction, regs);
                Ok(())
            }
            Opcode::Not => {
                opcodes::not(instruction, regs);
                Ok(())
            }
            Opcode::Br => {
                opcodes::br(instruction, regs);
                Ok(())
            }
            Opcode::Jmp => {
                opcodes::jmp_or_ret(instruction, regs);
                Ok(())
            }
            Opcode::Jsr => {
                opcodes::jsr(instruction, regs);
                Ok(())
            }
            Opcode::Ld => opcodes::ld(instruction, regs, mem),
            Opcode::Ldi => opcodes::ldi(instruction, regs, mem),
            Opcode::Ldr => opcodes::ldr(instruction, regs, mem),
            Opcode::Lea => {
                opcodes::lea(instruction, regs);
                Ok(())
            }
            Opcode::St => {
                opcodes::st(instruction, regs, mem);
                Ok(())
            }
            Opcode::Sti => opcodes::sti(instruction, regs, mem),
            Opcode::Str => {
                opcodes::str(instruction, regs, mem);
                Ok(())
            }
            // unused in this machine
            Opcode::Rti | Opcode::Res => Ok(()),
            Opcode::Trap => return self.trap(instruction, address),
        };
        match result {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(Err(e.into())),
        }
    }

    fn trap(
        &mut self,
        instruction: Instruction,
        address: u16,
    ) -> ControlFlow<Result<(), ExecutionError>> {
        let vector = instruction.trap_vector();
        let Some(trap_vector) = TrapVector::n(vector) else {
            warn!("Ignoring unknown trap vector {vector:#04X} at address {address:#06X}");
            return ControlFlow::Continue(());
        };
        let regs = &mut self.registers;
        let mem = &mut self.memory;
        let stdout = &mut self.stdout;
        match trap_vector {
            TrapVector::GetC => trap_routines::get_c(regs, mem),
            TrapVector::Out => trap_routines::out(regs, stdout),
            TrapVector::PutS => trap_routines::put_s(regs, mem, stdout),
            TrapVector::In => trap_routines::in_trap(regs, mem, stdout),
            TrapVector::PutSp => trap_routines::put_sp(regs, mem, stdout),
            TrapVector::Halt => trap_routines::halt(stdout),
        }
    }

    /// Zeroes registers and memory, the machine is halted afterwards.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.reset();
        self.state = MachineState::Halted;
    }
    /// Zeroes registers only, keeping the loaded program.
    pub fn reset_registers(&mut self) {
        self.registers.reset();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }
    #[must_use]
    pub const fn state(&self) -> MachineState {
        self.state
    }
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
    #[must_use]
    pub const fn stdout(&self) -> &W {
        &self.stdout
    }
}
