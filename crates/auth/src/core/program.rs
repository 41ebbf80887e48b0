use tracing::debug;
use warden_vm::core::{
    opcodes::{
        CALL_EXTERNAL, CHECKSUM_CHECK, CHECKSUM_PUSH, CMP, JUMP_IF_EQUAL, MUTATE, PUSH, RET,
        ROTL, TIMING_CHECK, XOR,
    },
    types::{rotate_left, Word},
};

use super::ids::CallIds;
use crate::{
    assembler::{checksum, Assembler},
    error::Error,
};

/// Bits the folded checksums are rotated by to derive the key.
pub const KEY_ROTATION: Word = 5;

/// Where the interesting parts of an [`AuthProgram`] live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthLayout {
    /// Address of the word holding the user's key
    pub input: usize,
    /// Address of the `checksum_check` guarding the critical section
    pub checksum_check: usize,
    /// First word of the critical section
    pub critical_start: usize,
    /// Length of the critical section
    pub critical_len: usize,
    /// First word of the second checksum's window
    pub window_start: usize,
    /// Length of the second checksum's window
    pub window_len: usize,
    /// Address of the conditional jump
    pub jump: usize,
    /// First word of the failure branch
    pub failure_branch: usize,
    /// First word of the success branch
    pub success_branch: usize,
}

/// A built authentication program and its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthProgram {
    /// The program words
    pub words: Vec<Word>,

    /// Addresses of the program's parts
    pub layout: AuthLayout,
}

impl AuthProgram {
    /// The words of the critical section.
    pub fn critical_section(&self) -> &[Word] {
        let start = self.layout.critical_start;
        &self.words[start..start + self.layout.critical_len]
    }

    /// The key this program accepts: the checksum of the critical section XORed with the
    /// checksum of its middle window, rotated left by [`KEY_ROTATION`].
    ///
    /// The key is a function of the code alone; it does not depend on the input or the call ids.
    pub fn expected_key(&self) -> Word {
        let window_start = self.layout.window_start;
        let window = &self.words[window_start..window_start + self.layout.window_len];
        rotate_left(checksum(self.critical_section()) ^ checksum(window), KEY_ROTATION)
    }
}

/// Builds the authentication program for `input`.
///
/// The program pushes the input, verifies the critical section against an embedded checksum,
/// derives the key from two checksums of the critical section, compares, and branches to a
/// `call_external` with either the success or the failure id. Every instruction up to the branch
/// is followed by a `mutate` that blanks its opcode once it has run.
pub fn build_auth_program(input: Word, ids: CallIds) -> Result<AuthProgram, Error> {
    let mut asm = Assembler::new();

    let push = asm.emit_obfuscated(PUSH, &[input]);

    // operands are patched once the critical section is laid out
    let checksum_check = asm.emit_obfuscated(CHECKSUM_CHECK, &[0, 0, 0]);

    let critical_start = asm.here();
    let whole = asm.emit_obfuscated(CHECKSUM_PUSH, &[0, 0]);
    let window = asm.emit_obfuscated(CHECKSUM_PUSH, &[0, 0]);
    asm.emit_obfuscated(XOR, &[]);
    asm.emit_obfuscated(ROTL, &[KEY_ROTATION]);
    asm.emit_obfuscated(CMP, &[]);
    let jump = asm.emit_obfuscated(JUMP_IF_EQUAL, &[0]);
    let critical_len = asm.here() - critical_start;

    // each branch reports, then rewrites its call id to the other branch's
    let failure_branch = asm.emit_obfuscated(CALL_EXTERNAL, &[ids.failure]);
    asm.emit_obfuscated(MUTATE, &[failure_branch as Word + 1, ids.success]);
    asm.emit_obfuscated(TIMING_CHECK, &[]);
    asm.emit(RET, &[]);

    let success_branch = asm.emit_obfuscated(CALL_EXTERNAL, &[ids.success]);
    asm.emit_obfuscated(MUTATE, &[success_branch as Word + 1, ids.failure]);
    asm.emit_obfuscated(TIMING_CHECK, &[]);
    asm.emit(RET, &[]);

    asm.patch(jump + 1, success_branch as Word)?;

    asm.patch(whole + 1, critical_start as Word)?;
    asm.patch(whole + 2, critical_len as Word)?;

    let (mut window_offset, mut window_len) = (critical_len / 4, critical_len / 2);
    if window_len == 0 {
        (window_offset, window_len) = (0, critical_len);
    }
    let window_start = critical_start + window_offset;
    asm.patch(window + 1, window_start as Word)?;
    asm.patch(window + 2, window_len as Word)?;

    // computed last, over the fully patched critical section
    let expected = checksum(&asm.words()[critical_start..critical_start + critical_len]);
    asm.patch(checksum_check + 1, critical_start as Word)?;
    asm.patch(checksum_check + 2, critical_len as Word)?;
    asm.patch(checksum_check + 3, expected)?;

    let words = asm.finish();
    debug!(words = words.len(), critical_start, critical_len, "built authentication program");

    Ok(AuthProgram {
        words,
        layout: AuthLayout {
            input: push + 1,
            checksum_check,
            critical_start,
            critical_len,
            window_start,
            window_len,
            jump,
            failure_branch,
            success_branch,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> CallIds {
        CallIds::new(0x1234_5678, 0x5A5A_5A5A).expect("valid mask")
    }

    #[test]
    fn test_layout() {
        let program = build_auth_program(42, ids()).expect("program builds");
        let layout = program.layout;

        assert_eq!(layout.input, 1);
        assert_eq!(layout.checksum_check, 5);
        assert_eq!(layout.critical_start, 12);
        assert_eq!(layout.critical_len, 30);
        assert_eq!((layout.window_start, layout.window_len), (19, 15));
        assert_eq!(layout.jump, 37);
        assert_eq!(layout.failure_branch, 42);
        assert_eq!(layout.success_branch, 58);
        assert_eq!(program.words.len(), 74);

        assert_eq!(program.words[layout.input], 42);
        assert_eq!(program.words[layout.jump + 1], 58);
        assert_eq!(
            &program.words[layout.checksum_check..layout.checksum_check + 4],
            &[CHECKSUM_CHECK, 12, 30, checksum(program.critical_section())]
        );
    }

    #[test]
    fn test_key_is_independent_of_input_and_ids() {
        let a = build_auth_program(1, ids()).expect("program builds");
        let b = build_auth_program(-99, CallIds::new(7, 0x10).expect("valid mask"))
            .expect("program builds");
        assert_eq!(a.expected_key(), b.expected_key());
    }

    #[test]
    fn test_key_changes_with_code() {
        let mut program = build_auth_program(0, ids()).expect("program builds");
        let key = program.expected_key();
        // outside the middle window, so only the whole-section checksum changes
        program.words[program.layout.critical_start + 1] ^= 1;
        assert_ne!(program.expected_key(), key);
    }

    #[test]
    fn test_branches_flip_their_call_ids() {
        let program = build_auth_program(0, ids()).expect("program builds");
        let failure = program.layout.failure_branch;
        let success = program.layout.success_branch;

        assert_eq!(&program.words[failure..failure + 2], &[CALL_EXTERNAL, ids().failure]);
        assert_eq!(
            &program.words[failure + 5..failure + 8],
            &[MUTATE, failure as Word + 1, ids().success]
        );
        assert_eq!(&program.words[success..success + 2], &[CALL_EXTERNAL, ids().success]);
        assert_eq!(program.words[success - 1], RET);
        assert_eq!(program.words.last(), Some(&RET));
    }
}
