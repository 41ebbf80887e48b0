use crate::{core::types::Word, error::Error};

use super::super::core::VM;

/// CMP - Equality comparison, pushing 1 if the two values are equal and 0 otherwise
pub fn cmp(vm: &mut VM) -> Result<(), Error> {
    let (a, b) = vm.stack.pop_pair()?;
    vm.stack.push(Word::from(a == b));
    Ok(())
}
