//! Fixed-point amounts in the registry's unit of account.
//!
//! Amounts are stored as integers with 18 decimal places so fee checks and
//! balance accounting never touch floating point. 1 unit = 10^18 atomic units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw atomic representation of an amount.
pub type AtomicUnits = u128;

/// Number of decimal places carried by an [`Amount`].
pub const AMOUNT_DECIMALS: u32 = 18;

/// Atomic units in one whole unit.
pub const ATOMIC_PER_UNIT: AtomicUnits = 10u128.pow(AMOUNT_DECIMALS);

/// Errors raised while parsing a decimal amount string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount string is empty")]
    Empty,
    #[error("amount '{0}' is not a non-negative decimal number")]
    Malformed(String),
    #[error("amount '{value}' has more than {max} decimal places")]
    TooPrecise { value: String, max: u32 },
    #[error("amount '{0}' does not fit in 128 bits of atomic units")]
    Overflow(String),
}

/// Non-negative amount with atomic precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    atomic: AtomicUnits,
}

impl Amount {
    pub const ZERO: Amount = Amount { atomic: 0 };

    /// Create an amount from atomic units
    pub const fn from_atomic(atomic: AtomicUnits) -> Self {
        Self { atomic }
    }

    /// Create an amount from whole units
    pub fn from_units(units: u128) -> Self {
        Self {
            atomic: units.saturating_mul(ATOMIC_PER_UNIT),
        }
    }

    pub fn atomic(&self) -> AtomicUnits {
        self.atomic
    }

    pub fn is_zero(&self) -> bool {
        self.atomic == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.atomic.checked_add(other.atomic).map(Amount::from_atomic)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.atomic.checked_sub(other.atomic).map(Amount::from_atomic)
    }

    /// Parse a decimal string such as `"0.1"` or `"12"`.
    pub fn parse(value: &str) -> Result<Self, AmountError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountError::Malformed(trimmed.to_string()));
        }

        if fraction.len() > AMOUNT_DECIMALS as usize {
            return Err(AmountError::TooPrecise {
                value: trimmed.to_string(),
                max: AMOUNT_DECIMALS,
            });
        }

        let overflow = || AmountError::Overflow(trimmed.to_string());

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let fraction_atomic: u128 = if fraction.is_empty() {
            0
        } else {
            let scale = 10u128.pow(AMOUNT_DECIMALS - fraction.len() as u32);
            let digits: u128 = fraction.parse().map_err(|_| overflow())?;
            digits * scale
        };

        whole_units
            .checked_mul(ATOMIC_PER_UNIT)
            .and_then(|atomic| atomic.checked_add(fraction_atomic))
            .map(Amount::from_atomic)
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.atomic / ATOMIC_PER_UNIT;
        let fraction = self.atomic % ATOMIC_PER_UNIT;

        if fraction == 0 {
            return write!(f, "{}", whole);
        }

        let digits = format!("{:0width$}", fraction, width = AMOUNT_DECIMALS as usize);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}
