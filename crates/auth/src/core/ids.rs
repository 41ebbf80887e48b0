use rand::Rng;
use warden_vm::core::types::Word;

use crate::error::Error;

/// The pair of external call ids an authentication program reports through.
///
/// The success id is random for every program, and the failure id is derived from it with a
/// mask, so neither appears as a stable constant across builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallIds {
    /// Called when the key is accepted
    pub success: Word,

    /// Called when the key is rejected
    pub failure: Word,
}

impl CallIds {
    /// Derives the failure id from `success` and `mask`.
    ///
    /// ```
    /// use warden_auth::CallIds;
    ///
    /// let ids = CallIds::new(0x0F0F_0F0F, 0x5A5A_5A5A).expect("non-zero mask");
    /// assert_eq!(ids.failure, 0x0F0F_0F0F ^ 0x5A5A_5A5A);
    /// ```
    pub fn new(success: Word, mask: Word) -> Result<Self, Error> {
        if mask == 0 {
            return Err(Error::InvalidMask(mask));
        }
        Ok(Self { success, failure: success ^ mask })
    }

    /// Picks a success id uniformly from `1..=i32::MAX` and derives the failure id from it.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, mask: Word) -> Result<Self, Error> {
        Self::new(rng.gen_range(1..=Word::MAX), mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_ids_are_distinct_and_positive() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let ids = CallIds::random(&mut rng, 0x5A5A5A5A).expect("valid mask");
            assert!(ids.success >= 1);
            assert_ne!(ids.success, ids.failure);
            assert_eq!(ids.success ^ ids.failure, 0x5A5A5A5A);
        }
    }

    #[test]
    fn test_zero_mask_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(CallIds::random(&mut rng, 0), Err(Error::InvalidMask(0))));
    }
}
