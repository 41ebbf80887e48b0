use std::{fmt, time::Duration};

use crate::{
    core::{integrity::Violation, opcodes::Opcode, types::Word},
    error::Error,
};

/// Where a VM is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// No run has started since construction or the last reset.
    Idle,

    /// A run is in progress.
    Running,

    /// The last run stopped for the given reason.
    Halted(Halt),
}

impl Status {
    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }
}

/// The reason a run stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Halt {
    /// A `ret` opcode was executed.
    Returned,

    /// The instruction pointer moved past the last word of the program.
    EndOfProgram,

    /// The integrity latch was set.
    IntegrityFailure,

    /// A word that is not a defined opcode was fetched.
    UnknownOpcode {
        /// The word that was fetched
        opcode: Word,
        /// Where it was fetched from
        address: usize,
    },

    /// A structural fault, such as a stack underflow or an out-of-bounds operand.
    Fault(Error),

    /// The configured step budget was used up.
    StepLimit,
}

impl Halt {
    /// Whether the run ended the way a well-formed program ends.
    pub fn is_normal(&self) -> bool {
        matches!(self, Halt::Returned | Halt::EndOfProgram)
    }
}

impl From<Error> for Halt {
    fn from(error: Error) -> Self {
        match error {
            Error::UnknownOpcode { opcode, address } => Halt::UnknownOpcode { opcode, address },
            other => Halt::Fault(other),
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Returned => write!(f, "returned"),
            Halt::EndOfProgram => write!(f, "reached end of program"),
            Halt::IntegrityFailure => write!(f, "integrity failure"),
            Halt::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode {opcode} at {address}")
            }
            Halt::Fault(error) => write!(f, "fault: {error}"),
            Halt::StepLimit => write!(f, "step limit reached"),
        }
    }
}

/// [`ExecutionResult`] is the result of a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Why the run stopped.
    pub halt: Halt,

    /// The instruction pointer when the run stopped.
    pub instruction: usize,

    /// The number of instructions executed.
    pub steps: u64,

    /// The top of the stack, or zero if the stack is empty.
    pub result: Word,

    /// The violation that set the integrity latch, if any.
    pub violation: Option<Violation>,

    /// Time from the start of the run to its end, on the VM's clock.
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Whether the integrity latch was set when the run stopped.
    pub fn is_tampered(&self) -> bool {
        self.violation.is_some()
    }
}

/// [`Instruction`] is a single executed instruction. It is returned by [`VM::step`], and is used
/// for tracing execution.
///
/// [`VM::step`]: super::VM::step
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The address the opcode was fetched from.
    pub address: usize,

    /// The decoded opcode.
    pub opcode: Opcode,

    /// The immediates following the opcode, as they were before it executed.
    pub operands: Vec<Word>,

    /// The stack depth after the instruction executed.
    pub stack_depth: usize,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x} {}", self.address, self.opcode)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
