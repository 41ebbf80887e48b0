/// A single machine word. Programs, immediates and stack values are all words.
pub type Word = i32;

/// Reinterprets `value` as an unsigned 32-bit word and rotates it left by `bits`.
///
/// `bits` is taken modulo 32, so a rotation by 0 or 32 is the identity.
///
/// ```
/// use warden_vm::core::types::rotate_left;
///
/// assert_eq!(rotate_left(1, 4), 16);
/// assert_eq!(rotate_left(i32::MIN, 1), 1);
/// assert_eq!(rotate_left(0x1234, 32), 0x1234);
/// ```
pub fn rotate_left(value: Word, bits: Word) -> Word {
    (value as u32).rotate_left(bits.rem_euclid(32) as u32) as Word
}

/// Converts a word to a program address, rejecting negative values.
///
/// ```
/// use warden_vm::core::types::to_address;
///
/// assert_eq!(to_address(7), Some(7));
/// assert_eq!(to_address(-1), None);
/// ```
pub fn to_address(word: Word) -> Option<usize> {
    usize::try_from(word).ok()
}
