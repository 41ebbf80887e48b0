use crate::{core::vm::Halt, error::Error};

use super::super::core::VM;

/// RET - Halt execution
pub fn ret(vm: &mut VM) -> Result<(), Error> {
    vm.halt(Halt::Returned);
    Ok(())
}

/// JUMP_IF_EQUAL - Conditional jump. Pops the condition, then reads the destination. The jump is
/// taken only when the condition is exactly 1 and the integrity latch is clear.
pub fn jump_if_equal(vm: &mut VM) -> Result<(), Error> {
    let condition = vm.stack.pop()?;
    let destination = vm.immediate()?;

    if condition == 1 && !vm.integrity.failed() {
        vm.jump(destination)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{integrity::Violation, opcodes::*};

    fn vm_at_jump(condition: i32) -> VM {
        let mut vm = VM::new();
        vm.load(&[JUMP_IF_EQUAL, 3, RET, PUSH, 7, RET]);
        vm.start();
        vm.stack.push(condition);
        vm.instruction = 1;
        vm
    }

    #[test]
    fn test_jump_taken_on_one() {
        let mut vm = vm_at_jump(1);
        jump_if_equal(&mut vm).expect("jump succeeds");
        assert_eq!(vm.instruction, 3);
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn test_jump_suppressed_when_latch_set() {
        let mut vm = vm_at_jump(1);
        vm.integrity.trip(Violation::ChecksumMismatch { expected: 0, actual: 1 });

        jump_if_equal(&mut vm).expect("handler succeeds");
        assert_eq!(vm.instruction, 2);
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn test_jump_to_program_end_is_allowed() {
        let mut vm = vm_at_jump(1);
        assert!(vm.program.mutate(1, 6));
        jump_if_equal(&mut vm).expect("jump succeeds");
        assert_eq!(vm.instruction, 6);
    }
}
