use tracing::debug;

use crate::error::Error;

use super::super::core::VM;

/// CALL_EXTERNAL - Invoke the host callback registered under an immediate id. Unregistered ids
/// are ignored.
pub fn call_external(vm: &mut VM) -> Result<(), Error> {
    let id = vm.immediate()?;
    if !vm.call_external(id) {
        debug!(id, "no external call registered");
    }
    Ok(())
}

/// MUTATE - Overwrite a program word. Reads the address and then the value; addresses outside
/// the program are ignored.
pub fn mutate(vm: &mut VM) -> Result<(), Error> {
    let address = vm.immediate()?;
    let value = vm.immediate()?;
    if !vm.program.mutate(address, value) {
        debug!(address, "ignored mutate outside program");
    }
    Ok(())
}
