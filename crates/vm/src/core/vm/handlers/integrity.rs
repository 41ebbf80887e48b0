use crate::error::Error;

use super::super::core::VM;

/// TIMING_CHECK - Taint the run if more than the threshold has elapsed since it started
pub fn timing_check(vm: &mut VM) -> Result<(), Error> {
    vm.integrity.check_timing();
    Ok(())
}

/// CHECKSUM_CHECK - Fold a program range and taint the run if it differs from an immediate
///
/// Reads `start`, `len` and `expected`, in that order. The range is folded over the program as it
/// is now, so earlier mutations are visible.
pub fn checksum_check(vm: &mut VM) -> Result<(), Error> {
    let start = vm.immediate()?;
    let len = vm.immediate()?;
    let expected = vm.immediate()?;

    let actual = vm.program.checksum(start, len)?;
    vm.integrity.check_checksum(expected, actual);
    Ok(())
}

/// CHECKSUM_PUSH - Fold a program range and push the result
pub fn checksum_push(vm: &mut VM) -> Result<(), Error> {
    let start = vm.immediate()?;
    let len = vm.immediate()?;

    let actual = vm.program.checksum(start, len)?;
    vm.stack.push(actual);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::{
        integrity::{fold, Violation},
        opcodes::*,
        vm::{Halt, VM},
    };

    #[test]
    fn test_checksum_push_sees_mutations() {
        let mut vm = VM::new();
        vm.load(&[MUTATE, 7, 5, CHECKSUM_PUSH, 7, 1, RET, 0]);
        let result = vm.run();
        assert_eq!(result.result, 5);
    }

    #[test]
    fn test_checksum_check_passes_on_embedded_fold() {
        let body = [PUSH, 1, PUSH, 2, ADD];
        let mut words = body.to_vec();
        words.extend([CHECKSUM_CHECK, 0, 5, fold(&body), RET]);

        let mut vm = VM::new();
        vm.load(&words);
        let result = vm.run();
        assert_eq!(result.halt, Halt::Returned);
        assert!(!result.is_tampered());
        assert_eq!(result.result, 3);
    }

    #[test]
    fn test_checksum_check_detects_patch() {
        let body = [PUSH, 1, PUSH, 2, ADD];
        let mut words = body.to_vec();
        words.extend([CHECKSUM_CHECK, 0, 5, fold(&body), RET]);
        words[3] = 40;

        let mut vm = VM::new();
        vm.load(&words);
        let result = vm.run();
        assert_eq!(result.halt, Halt::IntegrityFailure);
        assert!(matches!(result.violation, Some(Violation::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_checksum_range_out_of_bounds_faults() {
        let mut vm = VM::new();
        vm.load(&[CHECKSUM_PUSH, 2, 10]);
        let result = vm.run();
        assert!(matches!(result.halt, Halt::Fault(crate::Error::ChecksumRange { .. })));
        assert!(!result.is_tampered());
    }
}
