//! Warden opcodes and related utilities.
//!
//! This module provides:
//! - the opcode constants, numbered for compatibility with already-emitted programs
//! - the [`Opcode`] enum the dispatcher decodes fetched words into
//! - [`OpCodeInfo`], describing each opcode's inline operands and stack effect

use std::fmt::{self, Display};

use paste::paste;

use super::types::Word;

/// Information about opcode, such as name, and stack inputs and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpCodeInfo {
    /// Mnemonic
    name: &'static str,
    /// Words consumed from the program after the opcode.
    immediates: u8,
    /// Stack inputs.
    inputs: u8,
    /// Stack outputs.
    outputs: u8,
    /// If the opcode stops execution. aka RET
    terminating: bool,
    /// Whether the opcode belongs to the tamper-detection layer.
    integrity: bool,
}

impl OpCodeInfo {
    /// Creates a new opcode info with the given name and default values.
    pub const fn new(name: &'static str) -> Self {
        Self { name, immediates: 0, inputs: 0, outputs: 0, terminating: false, integrity: false }
    }

    /// Returns the name of the opcode.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of inline operands.
    #[inline]
    pub const fn immediates(&self) -> u8 {
        self.immediates
    }

    /// Returns the number of stack inputs.
    #[inline]
    pub const fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Returns the number of stack outputs.
    #[inline]
    pub const fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Returns whether the opcode is terminating.
    #[inline]
    pub const fn terminating(&self) -> bool {
        self.terminating
    }

    /// Returns whether the opcode is one of the integrity primitives.
    #[inline]
    pub const fn is_integrity(&self) -> bool {
        self.integrity
    }
}

/// Sets the number of inline operands.
#[inline]
pub const fn immediates(mut op: OpCodeInfo, count: u8) -> OpCodeInfo {
    op.immediates = count;
    op
}

/// Sets the number of stack inputs and outputs.
#[inline]
pub const fn stack_io(mut op: OpCodeInfo, inputs: u8, outputs: u8) -> OpCodeInfo {
    op.inputs = inputs;
    op.outputs = outputs;
    op
}

/// Sets the terminating flag to true.
#[inline]
pub const fn terminating(mut op: OpCodeInfo) -> OpCodeInfo {
    op.terminating = true;
    op
}

/// Marks the opcode as part of the integrity layer.
#[inline]
pub const fn integrity(mut op: OpCodeInfo) -> OpCodeInfo {
    op.integrity = true;
    op
}

macro_rules! opcodes {
    ($($val:literal => $name:ident => $variant:ident => $($modifier:ident $(( $($modifier_arg:expr),* ))?),*);* $(;)?) => {
        // create a constant for each opcode
        $(
            #[doc = concat!("The `", stringify!($val), "` (\"", stringify!($name),"\") opcode.")]
            pub const $name: Word = $val;
        )*

        /// A decoded opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Opcode {
            $(
                #[doc = concat!("`", stringify!($name), "`")]
                $variant = $val,
            )*
        }

        impl Opcode {
            /// Every defined opcode, in numeric order.
            pub const ALL: [Opcode; OPCODE_COUNT] = [$(Opcode::$variant),*];

            /// Returns the word this opcode is encoded as.
            #[inline]
            pub const fn word(self) -> Word {
                self as Word
            }
        }

        impl TryFrom<Word> for Opcode {
            type Error = Word;

            fn try_from(word: Word) -> Result<Self, Self::Error> {
                match word {
                    $($val => Ok(Opcode::$variant),)*
                    other => Err(other),
                }
            }
        }

        /// Number of defined opcodes.
        pub const OPCODE_COUNT: usize = [$($val),*].len();

        /// Maps each opcode to its info.
        pub const OPCODE_INFO_TABLE: [OpCodeInfo; OPCODE_COUNT] = {
            let mut map = [OpCodeInfo::new("unknown"); OPCODE_COUNT];
            let mut expected: usize = 0;
            $(
                assert!($val as usize == expected, "opcodes must be dense and sorted in ascending order");
                expected += 1;
                let info = paste! { OpCodeInfo::new(stringify!([<$name:lower>])) };
                $(
                let info = $modifier(info, $($($modifier_arg),*)?);
                )*
                map[$val] = info;
            )*
            let _ = expected;
            map
        };
    }
}

opcodes! {
    0 => PUSH => Push => immediates(1), stack_io(0, 1);
    1 => POP => Pop => stack_io(1, 0);
    2 => ADD => Add => stack_io(2, 1);
    3 => RET => Ret => terminating;
    4 => CALL_EXTERNAL => CallExternal => immediates(1);
    5 => CMP => Cmp => stack_io(2, 1);
    6 => JUMP_IF_EQUAL => JumpIfEqual => immediates(1), stack_io(1, 0);
    7 => SUB => Sub => stack_io(2, 1);
    8 => PUSH_JUNK => PushJunk => immediates(1);
    9 => XOR => Xor => stack_io(2, 1);
    10 => MUTATE => Mutate => immediates(2);
    11 => TIMING_CHECK => TimingCheck => integrity;
    12 => CHECKSUM_CHECK => ChecksumCheck => immediates(3), integrity;
    13 => CHECKSUM_PUSH => ChecksumPush => immediates(2), stack_io(0, 1), integrity;
    14 => ROTL => Rotl => immediates(1), stack_io(1, 1);
}

impl Opcode {
    /// Returns the [`OpCodeInfo`] for this opcode.
    #[inline]
    pub const fn info(self) -> OpCodeInfo {
        OPCODE_INFO_TABLE[self as usize]
    }

    /// Returns the mnemonic of this opcode.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.info().name()
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Get the name of an opcode word, or `"unknown"` for words that are not opcodes.
///
/// ```
/// use warden_vm::core::opcodes::{opcode_name, CHECKSUM_PUSH};
///
/// assert_eq!(opcode_name(CHECKSUM_PUSH), "checksum_push");
/// assert_eq!(opcode_name(99), "unknown");
/// ```
#[inline]
pub fn opcode_name(opcode: Word) -> &'static str {
    Opcode::try_from(opcode).map(Opcode::name).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip_through_words() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::try_from(opcode.word()), Ok(opcode));
        }
        assert_eq!(Opcode::try_from(15), Err(15));
        assert_eq!(Opcode::try_from(-1), Err(-1));
    }

    #[test]
    fn test_compatible_numbering() {
        assert_eq!(PUSH, 0);
        assert_eq!(RET, 3);
        assert_eq!(PUSH_JUNK, 8);
        assert_eq!(MUTATE, 10);
        assert_eq!(ROTL, 14);
        assert_eq!(OPCODE_COUNT, 15);
    }

    #[test]
    fn test_opcode_info() {
        assert_eq!(Opcode::Push.name(), "push");
        assert_eq!(Opcode::JumpIfEqual.name(), "jump_if_equal");
        assert_eq!(Opcode::ChecksumCheck.info().immediates(), 3);
        assert_eq!(Opcode::Mutate.info().immediates(), 2);
        assert_eq!(Opcode::Add.info().inputs(), 2);
        assert!(Opcode::Ret.info().terminating());
        assert!(Opcode::TimingCheck.info().is_integrity());
        assert!(!Opcode::Xor.info().is_integrity());
    }
}
