// Path: crates/types/src/app/shares.rs

//! Exact fixed-point decimals used for share ownership and exchange-rate math.

use crate::error::ParseDecError;
use parity_scale_codec::{Decode, Encode};
use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by every [`Dec`].
pub const SHARE_PRECISION: u32 = 18;

/// `10^SHARE_PRECISION`, the raw value of `1`.
const ATTO: u128 = 1_000_000_000_000_000_000;

fn unit() -> U256 {
    U256::from(ATTO)
}

/// How a division result is brought back to [`SHARE_PRECISION`] digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Toward zero.
    Down,
    /// Away from zero.
    Up,
    /// To nearest, ties to even.
    HalfEven,
}

/// A non-negative decimal with exactly [`SHARE_PRECISION`] fractional digits.
///
/// Stored as an integer count of `10^-18` units. Addition and subtraction are exact;
/// [`Dec::checked_mul_div`] computes through a 512-bit product and rounds once. No
/// operation rounds silently: anything out of range yields `None`.
///
/// The SCALE encoding is the 32-byte little-endian raw integer, so every value has
/// exactly one encoding. Serde uses the decimal string form.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Encode, Decode, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(U256);

/// A quantity of validator shares.
pub type Shares = Dec;

impl Dec {
    /// Zero.
    pub const ZERO: Dec = Dec(U256([0; 4]));

    /// The decimal equal to a whole number.
    pub fn from_int(n: u64) -> Self {
        Self(U256::from(u128::from(n) * ATTO))
    }

    /// Wraps a raw count of `10^-18` units.
    pub fn from_atto(raw: u128) -> Self {
        Self(U256::from(raw))
    }

    /// Wraps a raw 256-bit count of `10^-18` units.
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the raw count of `10^-18` units.
    pub fn raw(&self) -> U256 {
        self.0
    }

    /// Returns true if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact addition, `None` on overflow.
    pub fn checked_add(self, other: Dec) -> Option<Dec> {
        self.0.checked_add(other.0).map(Dec)
    }

    /// Exact subtraction, `None` if the result would be negative.
    pub fn checked_sub(self, other: Dec) -> Option<Dec> {
        self.0.checked_sub(other.0).map(Dec)
    }

    /// Computes `self * mul / div`, rounded once with `rounding`.
    ///
    /// Returns `None` when `div` is zero or the result does not fit.
    pub fn checked_mul_div(self, mul: Dec, div: Dec, rounding: Rounding) -> Option<Dec> {
        if div.is_zero() {
            return None;
        }
        // Raw units: (a / u) * (b / u) / (d / u) == (a * b / d) / u.
        let divisor = U512::from(div.0);
        let (quotient, remainder) = self.0.full_mul(mul.0).div_mod(divisor);
        let round_up = match rounding {
            Rounding::Down => false,
            Rounding::Up => !remainder.is_zero(),
            Rounding::HalfEven => {
                let twice = remainder << 1usize;
                twice > divisor || (twice == divisor && quotient.bit(0))
            }
        };
        let quotient = if round_up {
            quotient.checked_add(U512::one())?
        } else {
            quotient
        };
        U256::try_from(quotient).ok().map(Dec)
    }

    /// The integer part, `None` if it exceeds `u64`.
    pub fn trunc_to_u64(&self) -> Option<u64> {
        let whole = self.0 / unit();
        if whole > U256::from(u64::MAX) {
            return None;
        }
        Some(whole.low_u64())
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.0.div_mod(unit());
        if frac.is_zero() {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0>18}", frac.low_u64());
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Dec {
    type Err = ParseDecError;

    /// Parses `123`, `0.5` or `1.000000000000000001`. More than 18 fractional digits
    /// is an error, never a rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecError(s.to_string());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !all_digits(whole)
            || !all_digits(frac)
            || (s.contains('.') && frac.is_empty())
            || frac.len() > SHARE_PRECISION as usize
        {
            return Err(err());
        }
        let whole = U256::from_dec_str(whole).map_err(|_| err())?;
        let frac = if frac.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(&format!("{:0<18}", frac)).map_err(|_| err())?
        };
        whole
            .checked_mul(unit())
            .and_then(|w| w.checked_add(frac))
            .map(Dec)
            .ok_or_else(err)
    }
}

impl From<Dec> for String {
    fn from(d: Dec) -> Self {
        d.to_string()
    }
}

impl TryFrom<String> for Dec {
    type Error = ParseDecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
