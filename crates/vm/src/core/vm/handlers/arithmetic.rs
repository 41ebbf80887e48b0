use tracing::warn;

use crate::{
    core::{
        integrity::Violation,
        opcodes::{PUSH, PUSH_JUNK},
    },
    error::Error,
};

use super::super::core::VM;

/// ADD - Wrapping addition. Also checks that the program still opens with a `push` or
/// `push_junk`, and taints the run if it does not. The addition happens either way.
pub fn add(vm: &mut VM) -> Result<(), Error> {
    let first = vm.program.get(0);
    if !matches!(first, Some(PUSH | PUSH_JUNK)) {
        warn!(?first, "program entry word changed before add");
        vm.integrity.trip(Violation::ProgramShape { first });
    }

    let (a, b) = vm.stack.pop_pair()?;
    vm.stack.push(a.wrapping_add(b));
    Ok(())
}

/// SUB - Wrapping subtraction of the top value from the one below it
pub fn sub(vm: &mut VM) -> Result<(), Error> {
    let (a, b) = vm.stack.pop_pair()?;
    vm.stack.push(a.wrapping_sub(b));
    Ok(())
}
