// Path: crates/types/src/error/mod.rs
//! Core error types for the staking ledger.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the state store or the canonical codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors raised by the share accounting engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The validator has zero shares with non-zero tokens, or the reverse.
    #[error("Invalid validator exchange rate")]
    ExchangeRateInvalid,
    /// A conversion was requested against a validator holding no tokens.
    #[error("Validator holds no tokens")]
    ZeroTokens,
    /// More shares were removed than the validator has issued.
    #[error("Insufficient validator shares")]
    InsufficientShares,
    /// A fixed-point operation overflowed its representable range.
    #[error("Share arithmetic overflow")]
    Overflow,
}

impl ErrorCode for ShareError {
    fn code(&self) -> &'static str {
        match self {
            Self::ExchangeRateInvalid => "SHARE_EXCHANGE_RATE_INVALID",
            Self::ZeroTokens => "SHARE_ZERO_TOKENS",
            Self::InsufficientShares => "SHARE_INSUFFICIENT_SHARES",
            Self::Overflow => "SHARE_OVERFLOW",
        }
    }
}

/// A string that is not a non-negative decimal with at most 18 fractional digits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid decimal '{0}'")]
pub struct ParseDecError(pub String);

/// Errors returned by the token custody collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// The source account or pool cannot cover the requested amount.
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Balance currently held by the source.
        have: u64,
        /// Amount that was requested.
        need: u64,
    },
    /// Crediting the destination would overflow its balance.
    #[error("Balance overflow")]
    Overflow,
    /// The custody ledger could not read or write its balances.
    #[error("Custody state error: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for CustodyError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "CUSTODY_INSUFFICIENT_FUNDS",
            Self::Overflow => "CUSTODY_OVERFLOW",
            Self::State(_) => "CUSTODY_STATE_ERROR",
        }
    }
}

/// An abort signalled by a before-hook listener.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Hook '{listener}' rejected the operation: {reason}")]
pub struct HookError {
    /// Name of the listener that rejected the operation.
    pub listener: String,
    /// Human-readable reason given by the listener.
    pub reason: String,
}

impl HookError {
    /// Builds a hook error for the named listener.
    pub fn new(listener: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for HookError {
    fn code(&self) -> &'static str {
        "HOOK_REJECTED"
    }
}

/// Errors returned by staking operations.
///
/// Domain-validation variants are returned before anything is persisted. `State`,
/// `Custody` and `InvariantViolated` may surface after some writes have happened and
/// rely on the surrounding transaction discarding its writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    /// The validator's exchange rate is poisoned by a full slash.
    #[error("Validator exchange rate is invalid")]
    ExchangeRateInvalid,
    /// No delegation exists for the delegator on this validator.
    #[error("No delegator for address")]
    NoDelegatorForAddress,
    /// The delegation holds fewer shares than requested.
    #[error("Not enough delegation shares")]
    NotEnoughDelegationShares,
    /// The unbonding record already holds the maximum number of entries.
    #[error("Too many unbonding delegation entries for (delegator, validator) tuple")]
    MaxUnbondingDelegationEntries,
    /// The redelegation record already holds the maximum number of entries.
    #[error("Too many redelegation entries for (delegator, src-validator, dst-validator) tuple")]
    MaxRedelegationEntries,
    /// Source and destination validators are the same.
    #[error("Cannot redelegate to the same validator")]
    SelfRedelegation,
    /// The source or destination validator does not exist.
    #[error("Redelegation destination validator not found")]
    BadRedelegationDst,
    /// The delegator is already redelegating into the source validator.
    #[error("Redelegation to this validator already in progress; first redelegation to this validator must complete before next redelegation")]
    TransitiveRedelegation,
    /// The redelegated amount truncates to zero tokens.
    #[error("Too few tokens to redelegate (truncates to zero tokens)")]
    TinyRedelegationAmount,
    /// No unbonding record exists for the pair.
    #[error("No unbonding delegation found")]
    NoUnbondingDelegation,
    /// No redelegation record exists for the triplet.
    #[error("No redelegation found")]
    NoRedelegation,
    /// The validator does not exist.
    #[error("Validator does not exist")]
    NoValidatorFound,
    /// No delegation exists for the pair.
    #[error("No delegation for (address, validator) tuple")]
    NoDelegation,
    /// The request is malformed or out of range.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The share engine could not perform a conversion.
    #[error("Share arithmetic failed: {0}")]
    Shares(ShareError),
    /// The state store or codec failed.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// The token custody collaborator failed.
    #[error("Custody error: {0}")]
    Custody(#[from] CustodyError),
    /// A before-hook listener aborted the operation.
    #[error("{0}")]
    Hook(#[from] HookError),
    /// Stored state is corrupt or a logic invariant does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}

impl StakingError {
    /// Returns true for errors that indicate corrupted state rather than a bad request.
    ///
    /// A fatal error must abort the whole state transition; replicas must never
    /// commit state produced after one.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolated(_) | Self::State(StateError::Decode(_))
        )
    }
}

impl From<ShareError> for StakingError {
    fn from(e: ShareError) -> Self {
        match e {
            ShareError::ExchangeRateInvalid => Self::ExchangeRateInvalid,
            other => Self::Shares(other),
        }
    }
}

impl ErrorCode for StakingError {
    fn code(&self) -> &'static str {
        match self {
            Self::ExchangeRateInvalid => "STAKING_EXCHANGE_RATE_INVALID",
            Self::NoDelegatorForAddress => "STAKING_NO_DELEGATOR_FOR_ADDRESS",
            Self::NotEnoughDelegationShares => "STAKING_NOT_ENOUGH_DELEGATION_SHARES",
            Self::MaxUnbondingDelegationEntries => "STAKING_MAX_UNBONDING_ENTRIES",
            Self::MaxRedelegationEntries => "STAKING_MAX_REDELEGATION_ENTRIES",
            Self::SelfRedelegation => "STAKING_SELF_REDELEGATION",
            Self::BadRedelegationDst => "STAKING_BAD_REDELEGATION_DST",
            Self::TransitiveRedelegation => "STAKING_TRANSITIVE_REDELEGATION",
            Self::TinyRedelegationAmount => "STAKING_TINY_REDELEGATION_AMOUNT",
            Self::NoUnbondingDelegation => "STAKING_NO_UNBONDING_DELEGATION",
            Self::NoRedelegation => "STAKING_NO_REDELEGATION",
            Self::NoValidatorFound => "STAKING_NO_VALIDATOR_FOUND",
            Self::NoDelegation => "STAKING_NO_DELEGATION",
            Self::InvalidRequest(_) => "STAKING_INVALID_REQUEST",
            Self::Shares(e) => e.code(),
            Self::State(e) => e.code(),
            Self::Custody(e) => e.code(),
            Self::Hook(e) => e.code(),
            Self::InvariantViolated(_) => "STAKING_INVARIANT_VIOLATED",
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML document could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A parameter is out of its allowed range.
    #[error("Invalid parameter: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_rate_maps_to_domain_error() {
        let err: StakingError = ShareError::ExchangeRateInvalid.into();
        assert_eq!(err, StakingError::ExchangeRateInvalid);

        let err: StakingError = ShareError::Overflow.into();
        assert_eq!(err.code(), "SHARE_OVERFLOW");
    }

    #[test]
    fn only_corruption_is_fatal() {
        assert!(StakingError::InvariantViolated("bad status".into()).is_fatal());
        assert!(StakingError::State(StateError::Decode("truncated".into())).is_fatal());
        assert!(!StakingError::NoDelegation.is_fatal());
        assert!(!StakingError::State(StateError::Backend("io".into())).is_fatal());
    }

    #[test]
    fn nested_codes_are_preserved() {
        let err: StakingError = CustodyError::InsufficientFunds { have: 1, need: 2 }.into();
        assert_eq!(err.code(), "CUSTODY_INSUFFICIENT_FUNDS");
        let err: StakingError = HookError::new("slashing", "frozen").into();
        assert_eq!(err.code(), "HOOK_REJECTED");
        assert_eq!(err.to_string(), "Hook 'slashing' rejected the operation: frozen");
    }
}
