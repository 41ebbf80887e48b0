use std::{sync::Arc, time::Duration};

#[cfg(feature = "step-tracing")]
use tracing::trace;
use tracing::{debug, error, warn};

use crate::{
    core::{
        clock::{Clock, MonotonicClock},
        constants::{DEFAULT_TIMING_THRESHOLD, UNLIMITED_STEPS},
        external::ExternalCalls,
        integrity::Integrity,
        program::Program,
        stack::Stack,
        types::Word,
    },
    error::Error,
};

use super::{
    dispatch::DispatchTable,
    execution::{ExecutionResult, Halt, Instruction, Status},
};

/// The [`VM`] struct represents a Warden interpreter instance. \
/// It owns the [`Program`] it executes, the operand [`Stack`], the instruction pointer and the
/// [`Integrity`] latch for the duration of a run, along with the dispatch table and the registry
/// of host callbacks.
///
/// `run` borrows the VM mutably, so one instance can never execute two runs at once.
#[derive(Debug)]
pub struct VM {
    /// The program being executed. Handlers may rewrite it while it runs.
    pub program: Program,

    /// The operand stack.
    pub stack: Stack,

    /// The current instruction pointer.
    pub instruction: usize,

    /// The integrity latch and timing state.
    pub integrity: Integrity,

    /// Lifecycle of the current or last run.
    pub status: Status,

    /// The number of instructions executed in the current run.
    pub steps: u64,

    /// Maximum instructions per run, or zero for no limit.
    pub step_limit: u64,

    externals: ExternalCalls,
    dispatch: DispatchTable,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    /// Creates a new [`VM`] with an empty program, the host's monotonic clock and the default
    /// two second timing threshold.
    ///
    /// ```
    /// use warden_vm::core::vm::{Status, VM};
    ///
    /// let vm = VM::new();
    /// assert_eq!(vm.status, Status::Idle);
    /// assert!(vm.program.is_empty());
    /// ```
    pub fn new() -> VM {
        VM::with_clock(Arc::new(MonotonicClock::new()), DEFAULT_TIMING_THRESHOLD)
    }

    /// Creates a new [`VM`] whose timing probe reads `clock` and trips after `threshold`.
    pub fn with_clock(clock: Arc<dyn Clock>, threshold: Duration) -> VM {
        VM {
            program: Program::default(),
            stack: Stack::new(),
            instruction: 0,
            integrity: Integrity::new(clock, threshold),
            status: Status::Idle,
            steps: 0,
            step_limit: UNLIMITED_STEPS,
            externals: ExternalCalls::new(),
            dispatch: DispatchTable::new(),
        }
    }

    /// Limits every run to `limit` executed instructions. Zero removes the limit.
    pub fn with_step_limit(mut self, limit: u64) -> VM {
        self.step_limit = limit;
        self
    }

    /// Loads `words` as the program, replacing any previously loaded program. The words are not
    /// validated.
    ///
    /// ```
    /// use warden_vm::core::{opcodes::{PUSH, RET}, vm::VM};
    ///
    /// let mut vm = VM::new();
    /// vm.load(&[PUSH, 1, RET]);
    /// assert_eq!(vm.program.len(), 3);
    /// ```
    pub fn load(&mut self, words: &[Word]) {
        self.program = Program::new(words);
    }

    /// Registers `call` as the effect of `call_external <id>`. The last registration for an id
    /// wins.
    pub fn register_external_call(&mut self, id: Word, call: impl FnMut() + 'static) {
        if self.externals.register(id, call) {
            debug!(id, "replaced external call");
        }
    }

    /// Invokes the host callback registered under `id`, if any.
    pub(crate) fn call_external(&mut self, id: Word) -> bool {
        self.externals.call(id)
    }

    /// Returns the top of the operand stack, or zero if it is empty.
    ///
    /// ```
    /// use warden_vm::core::{opcodes::{PUSH, RET}, vm::VM};
    ///
    /// let mut vm = VM::new();
    /// assert_eq!(vm.result(), 0);
    ///
    /// vm.load(&[PUSH, 42, RET]);
    /// vm.run();
    /// assert_eq!(vm.result(), 42);
    /// ```
    pub fn result(&self) -> Word {
        self.stack.top_or_zero()
    }

    /// Stops the current run.
    pub(crate) fn halt(&mut self, halt: Halt) {
        self.status = Status::Halted(halt);
    }

    /// Reads the immediate at the instruction pointer and advances past it.
    pub(crate) fn immediate(&mut self) -> Result<Word, Error> {
        let word = self.program.fetch(self.instruction)?;
        self.instruction += 1;
        Ok(word)
    }

    /// Moves the instruction pointer to `destination`. A destination equal to the program length
    /// ends the run at the next cycle; anything past it is a fault.
    pub(crate) fn jump(&mut self, destination: Word) -> Result<(), Error> {
        match usize::try_from(destination) {
            Ok(address) if address <= self.program.len() => {
                self.instruction = address;
                Ok(())
            }
            _ => Err(Error::InvalidJump { destination, length: self.program.len() }),
        }
    }

    /// Begins a run: resets the instruction pointer and step counter, captures the start time,
    /// and marks the VM as running. The stack and the integrity latch carry over.
    pub fn start(&mut self) {
        self.instruction = 0;
        self.steps = 0;
        self.integrity.arm();
        self.status = Status::Running;
        debug!(words = self.program.len(), "starting run");
    }

    /// Fetches, decodes and executes the next instruction.
    fn _step(&mut self) -> Result<Instruction, Error> {
        let address = self.instruction;
        let word = self.program.fetch(address)?;
        self.instruction += 1;
        self.steps += 1;

        let (opcode, handler) = self.dispatch.resolve(word, address)?;
        let operand_count = opcode.info().immediates() as usize;
        let operands = self
            .program
            .words
            .get(address + 1..address + 1 + operand_count)
            .map(<[Word]>::to_vec)
            .unwrap_or_default();

        #[cfg(feature = "step-tracing")]
        trace!(
            pc = address,
            opcode = opcode.name(),
            operands = ?operands,
            stack = %self.stack,
            "executing opcode"
        );

        handler(self)?;

        Ok(Instruction { address, opcode, operands, stack_depth: self.stack.size() })
    }

    /// Executes one cycle of the run loop, returning the executed instruction.
    ///
    /// Before fetching, the cycle halts the run if the integrity latch is set, if the step budget
    /// is used up, or if the instruction pointer is past the end of the program. `None` is
    /// returned whenever no instruction executed, including when the VM is not running.
    ///
    /// ```
    /// use warden_vm::core::{opcodes::{PUSH, RET}, vm::{Halt, Status, VM}};
    ///
    /// let mut vm = VM::new();
    /// vm.load(&[PUSH, 5, RET]);
    /// vm.start();
    ///
    /// let push = vm.step().expect("push executes");
    /// assert_eq!(push.operands, vec![5]);
    /// vm.step(); // RET
    /// assert_eq!(vm.status, Status::Halted(Halt::Returned));
    /// assert!(vm.step().is_none());
    /// ```
    pub fn step(&mut self) -> Option<Instruction> {
        if !self.status.is_running() {
            return None;
        }

        if self.integrity.failed() {
            error!("integrity failure detected, halting");
            self.halt(Halt::IntegrityFailure);
            return None;
        }

        if self.step_limit != UNLIMITED_STEPS && self.steps >= self.step_limit {
            warn!(limit = self.step_limit, "step limit reached, halting");
            self.halt(Halt::StepLimit);
            return None;
        }

        if self.instruction >= self.program.len() {
            self.halt(Halt::EndOfProgram);
            return None;
        }

        let address = self.instruction;
        match self._step() {
            Ok(instruction) => Some(instruction),
            Err(e) => {
                error!(pc = address, "halting: {e}");
                self.halt(Halt::from(e));
                None
            }
        }
    }

    /// Executes the loaded program until it halts.
    ///
    /// Every outcome, including faults, is reported through the returned [`ExecutionResult`].
    ///
    /// ```
    /// use warden_vm::core::{opcodes::{PUSH, SUB, RET}, vm::{Halt, VM}};
    ///
    /// let mut vm = VM::new();
    /// vm.load(&[PUSH, 10, PUSH, 3, SUB, RET]);
    ///
    /// let result = vm.run();
    /// assert_eq!(result.halt, Halt::Returned);
    /// assert_eq!(result.result, 7);
    /// assert_eq!(result.steps, 4);
    /// ```
    pub fn run(&mut self) -> ExecutionResult {
        self.start();
        while self.status.is_running() {
            self.step();
        }

        let result = self.execution_result();
        debug!(steps = result.steps, halt = %result.halt, "run finished");
        result
    }

    /// Summarizes the current or last run. Used after driving a run with [`VM::step`].
    ///
    /// A run that has not halted yet is reported as [`Halt::EndOfProgram`].
    pub fn execution_result(&self) -> ExecutionResult {
        let halt = match &self.status {
            Status::Halted(halt) => halt.clone(),
            _ => Halt::EndOfProgram,
        };

        ExecutionResult {
            halt,
            instruction: self.instruction,
            steps: self.steps,
            result: self.result(),
            violation: self.integrity.violation(),
            elapsed: self.integrity.elapsed(),
        }
    }

    /// Resets the VM for a new run: clears the stack, instruction pointer and status.
    ///
    /// The program, registered callbacks and integrity latch are kept; once tampering has been
    /// detected the instance stays tainted.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.instruction = 0;
        self.steps = 0;
        self.status = Status::Idle;
    }
}
