//! Coin balance type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// An accumulated coin balance.
///
/// Balances live in a Shopify `number_integer` metafield, which stores its
/// value as a string. Years of hand edits and older scripts mean the stored
/// value is not always a clean integer, so parsing is deliberately lossy:
/// anything that does not read as an integer counts as zero rather than
/// poisoning later arithmetic.
///
/// ## Invariants
///
/// - A balance is never negative. Construction and arithmetic clamp at zero.
/// - Addition saturates instead of wrapping.
///
/// ## Examples
///
/// ```
/// use rasca_gana_core::Coins;
///
/// assert_eq!(Coins::parse_lossy("120").as_i64(), 120);
/// assert_eq!(Coins::parse_lossy("garbage").as_i64(), 0);
/// assert_eq!(Coins::new(10).saturating_add_clamped(-25), Coins::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Coins(i64);

impl Coins {
    /// The empty balance.
    pub const ZERO: Self = Self(0);

    /// Create a balance, clamping negative input to zero.
    #[must_use]
    pub const fn new(n: i64) -> Self {
        if n < 0 { Self(0) } else { Self(n) }
    }

    /// Get the balance as an i64.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Parse a metafield value, treating anything non-numeric as zero.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        s.trim().parse::<i64>().map_or(Self::ZERO, Self::new)
    }

    /// Apply a signed delta. The result never goes below zero and never
    /// wraps.
    #[must_use]
    pub const fn saturating_add_clamped(self, delta: i64) -> Self {
        Self::new(self.0.saturating_add(delta))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Coins {
    fn from(n: i64) -> Self {
        Self::new(n)
    }
}

impl From<Coins> for i64 {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = i64::deserialize(deserializer)?;
        Ok(Self::new(n))
    }
}
