use crate::error::Error;

use super::super::core::VM;

/// PUSH - Push an immediate onto the stack
pub fn push(vm: &mut VM) -> Result<(), Error> {
    let value = vm.immediate()?;
    vm.stack.push(value);
    Ok(())
}

/// POP - Discard the top of the stack. Does nothing on an empty stack.
pub fn pop(vm: &mut VM) -> Result<(), Error> {
    let _ = vm.stack.pop();
    Ok(())
}

/// PUSH_JUNK - Skip the following word without interpreting it
pub fn push_junk(vm: &mut VM) -> Result<(), Error> {
    vm.immediate()?;
    Ok(())
}
