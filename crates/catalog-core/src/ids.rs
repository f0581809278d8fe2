//! Product identifier type.
//!
//! Identifiers are positive integers assigned by the store. Parsing is total:
//! every malformed input yields an [`IdError`], never a panic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positive product identifier.
///
/// Serialized as a bare JSON number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ProductId(u64);

impl ProductId {
    /// The first identifier handed out by an empty store.
    pub const FIRST: Self = Self(1);

    /// Create a `ProductId` from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Zero` if `value` is zero.
    pub const fn new(value: u64) -> Result<Self, IdError> {
        if value == 0 {
            Err(IdError::Zero)
        } else {
            Ok(Self(value))
        }
    }

    /// Return the underlying integer.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` on overflow.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl FromStr for ProductId {
    type Err = IdError;

    /// Parse a `ProductId` from its decimal form.
    ///
    /// Only ASCII digits are accepted; signs, whitespace and fractions are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::NotNumeric);
        }
        let value = s.parse::<u64>().map_err(|_| IdError::OutOfRange)?;
        Self::new(value)
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for ProductId {
    type Error = IdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input contains characters other than ASCII digits.
    #[error("identifier must be a decimal number")]
    NotNumeric,

    /// The input does not fit in 64 bits.
    #[error("identifier out of range")]
    OutOfRange,

    /// Zero is not a valid identifier.
    #[error("identifier must be positive")]
    Zero,
}
