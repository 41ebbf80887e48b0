//! Integration tests for tamper resistance of authentication programs.

#[cfg(test)]
mod integration_tests {
    use std::{
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc,
        },
        time::Duration,
    };

    use warden_auth::{
        assembler::checksum, build_auth_program, run_auth_program, AuthProgram, CallIds, Verdict,
        DEFAULT_FAILURE_ID_MASK,
    };
    use warden_vm::core::{
        clock::Clock,
        integrity::Violation,
        opcodes::PUSH_JUNK,
        vm::{Halt, VM},
    };

    /// A clock that moves one second forward every time it is read.
    #[derive(Debug, Default)]
    struct SteppingClock {
        ticks: AtomicU64,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Duration {
            Duration::from_secs(self.ticks.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn ids() -> CallIds {
        CallIds::new(0x2BAD_F00D, DEFAULT_FAILURE_ID_MASK).expect("valid mask")
    }

    fn program_for_correct_key() -> AuthProgram {
        let key = build_auth_program(0, ids()).expect("program builds").expected_key();
        build_auth_program(key, ids()).expect("program builds")
    }

    #[test]
    fn test_correct_key_leaves_program_mutated() {
        let program = program_for_correct_key();
        let mut vm = VM::new();

        let (verdict, result) = run_auth_program(&mut vm, &program.words, ids());
        assert_eq!(verdict, Verdict::Granted);
        assert_eq!(result.halt, Halt::Returned);

        // executed opcodes were blanked, and the success call site now names the failure id
        assert_eq!(vm.program.get(0), Some(PUSH_JUNK));
        assert_eq!(vm.program.get(program.layout.critical_start), Some(PUSH_JUNK));
        assert_eq!(vm.program.get(program.layout.success_branch + 1), Some(ids().failure));
    }

    #[test]
    fn test_patched_critical_section_is_detected() {
        let mut program = program_for_correct_key();
        // retarget the conditional jump at the failure branch
        program.words[program.layout.jump + 1] = program.layout.failure_branch as i32;

        let mut vm = VM::new();
        let (verdict, result) = run_auth_program(&mut vm, &program.words, ids());
        assert!(matches!(verdict, Verdict::Tampered(Violation::ChecksumMismatch { .. })));
        assert_eq!(result.halt, Halt::IntegrityFailure);
    }

    #[test]
    fn test_consistent_patch_changes_the_key() {
        let mut program = program_for_correct_key();
        let original_key = program.expected_key();

        // patch a word outside the middle window, then fix up the embedded checksum
        let patched = program.layout.critical_start + program.layout.critical_len - 2;
        program.words[patched] ^= 0x40;
        program.words[program.layout.checksum_check + 3] = checksum(program.critical_section());
        assert_ne!(program.expected_key(), original_key);

        let mut vm = VM::new();
        let (verdict, result) = run_auth_program(&mut vm, &program.words, ids());
        assert_eq!(verdict, Verdict::Denied);
        assert!(!result.is_tampered());
    }

    #[test]
    fn test_skipping_the_integrity_check_derails_the_program() {
        let mut program = program_for_correct_key();
        program.words[program.layout.checksum_check] = PUSH_JUNK;

        let mut vm = VM::new();
        let (verdict, result) = run_auth_program(&mut vm, &program.words, ids());
        assert_eq!(verdict, Verdict::Denied);
        assert!(matches!(result.halt, Halt::UnknownOpcode { .. }));
    }

    #[test]
    fn test_slow_run_is_tampered_even_after_success() {
        let program = program_for_correct_key();
        let mut vm = VM::with_clock(Arc::new(SteppingClock::default()), Duration::from_millis(500));

        let (verdict, _) = run_auth_program(&mut vm, &program.words, ids());
        assert!(matches!(verdict, Verdict::Tampered(Violation::TimingAnomaly { .. })));
    }

    #[test]
    fn test_tainted_vm_stays_tainted() {
        let mut tampered = program_for_correct_key();
        tampered.words[tampered.layout.critical_start + 4] ^= 1;

        let mut vm = VM::new();
        let (verdict, _) = run_auth_program(&mut vm, &tampered.words, ids());
        assert!(matches!(verdict, Verdict::Tampered(_)));

        vm.reset();
        let (verdict, _) = run_auth_program(&mut vm, &program_for_correct_key().words, ids());
        assert!(matches!(verdict, Verdict::Tampered(_)));
    }
}
