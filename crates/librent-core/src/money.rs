//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Half of a $14.99 rental:                                               │
//! │    14.99 * 0.5 = 7.495  → which cent amount is that?                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1499 cents halved = 750 cents, rounded ONCE, at the boundary        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use librent_core::money::Money;
//!
//! let price = Money::from_cents(1499); // $14.99
//! let cashback = price.half_rounded(); // $7.50
//! assert_eq!(cashback.cents(), 750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Transparent serde**: Serializes as a plain integer in the stored JSON
///
/// Every monetary value in the system flows through this type:
/// catalog price, original price, savings, cashback, cart total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use librent_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Halves the amount, rounding half-cents away from zero.
    ///
    /// This is the cashback rule: returning a book refunds 50% of the price
    /// paid for the rental.
    ///
    /// ## Example
    /// ```rust
    /// use librent_core::money::Money;
    ///
    /// // $14.99 → $7.495 → $7.50
    /// assert_eq!(Money::from_cents(1499).half_rounded().cents(), 750);
    /// // $10.00 → $5.00 exactly
    /// assert_eq!(Money::from_cents(1000).half_rounded().cents(), 500);
    /// ```
    pub fn half_rounded(&self) -> Money {
        // +/-1 before dividing rounds the half-cent away from zero
        let cents = self.0 as i128;
        let rounded = if cents >= 0 {
            (cents + 1) / 2
        } else {
            (cents - 1) / 2
        };
        Money(rounded as i64)
    }

    /// Percentage discount of `self` relative to `original`, rounded to the
    /// nearest whole percent.
    ///
    /// ## Example
    /// ```rust
    /// use librent_core::money::Money;
    ///
    /// let price = Money::from_cents(1399);    // $13.99
    /// let original = Money::from_cents(2099); // $20.99
    /// assert_eq!(price.discount_percent_from(original), 33);
    /// ```
    pub fn discount_percent_from(&self, original: Money) -> u8 {
        if original.0 <= 0 {
            return 0;
        }
        let diff = (original.0 - self.0).max(0) as i128;
        // round((orig - price) / orig * 100)
        let pct = (diff * 100 + original.0 as i128 / 2) / original.0 as i128;
        pct.min(100) as u8
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summation over iterators (cart totals, cashback totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
