// Path: crates/types/src/prelude.rs

//! A curated set of commonly used traits and types.

pub use crate::app::{AccountId, BondStatus, Shares, ValidatorId};
pub use crate::error::{ErrorCode, StakingError, StateError};

/// An extension trait for `Option` that provides a convenient `required` method
/// to convert an `Option` to a `Result` with a specific error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, E>`, returning the provided
    /// error if the option is `None`.
    fn required<E>(self, err: E) -> Result<T, E>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required<E>(self, err: E) -> Result<T, E> {
        self.ok_or(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_maps_none_to_the_given_error() {
        let missing: Option<u64> = None;
        assert!(matches!(
            missing.required(StakingError::NoDelegation),
            Err(StakingError::NoDelegation)
        ));
        assert_eq!(Some(7u64).required(StakingError::NoDelegation).ok(), Some(7));
    }
}
