use crate::{core::types::rotate_left, error::Error};

use super::super::core::VM;

/// XOR - Bitwise exclusive or
pub fn xor(vm: &mut VM) -> Result<(), Error> {
    let (a, b) = vm.stack.pop_pair()?;
    vm.stack.push(a ^ b);
    Ok(())
}

/// ROTL - Rotate the top value left by an immediate bit count
pub fn rotl(vm: &mut VM) -> Result<(), Error> {
    let bits = vm.immediate()?;
    let value = vm.stack.pop()?;
    vm.stack.push(rotate_left(value, bits));
    Ok(())
}
