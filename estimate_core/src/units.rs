//! # Unit Types
//!
//! Money and measurement units used by estimate lines.
//!
//! ## Design Philosophy
//!
//! Amounts are held in the currency's minor unit (cents) as integers, so a
//! sum of displayed line amounts is always exactly the displayed total.
//! Conversions from floating-point prices round half away from zero, once,
//! at the point a price or amount is fixed.
//!
//! Measurements stay plain `f64` fields with a unit suffix in their name
//! (`height_m`, `treated_surface_m2`); [`Unit`] only labels line quantities.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::Money;
//!
//! let unit_price = Money::from_major(91.2);
//! let amount = unit_price.times(225.0);
//! assert_eq!(amount.cents(), 2_052_000);
//! assert_eq!(amount.to_string(), "20520.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

// ============================================================================
// Money
// ============================================================================

/// Amount of money in minor units (cents). Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from an integer number of cents
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Create from a major-unit amount (euros), rounded to the cent.
    ///
    /// Non-finite values map to zero.
    pub fn from_major(value: f64) -> Self {
        if !value.is_finite() {
            return Money::ZERO;
        }
        Money((value * 100.0).round() as i64)
    }

    /// Raw cents
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Value in major units (euros)
    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `self × quantity`, rounded to the cent
    pub fn times(self, quantity: f64) -> Money {
        Money::from_major(self.as_major() * quantity)
    }

    /// `self × ratio`, rounded to the cent (used for proportional fees and tax)
    pub fn scaled(self, ratio: f64) -> Money {
        self.times(ratio)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Format with a thousands separator and currency symbol, e.g. `"27 034,56 €"`.
    pub fn display_fr(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let euros = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::new();
        for (i, ch) in euros.chars().enumerate() {
            if i > 0 && (euros.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        format!("{}{},{:02} €", sign, grouped, cents)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

// ============================================================================
// Quantity units
// ============================================================================

/// Unit of a line quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Square metres
    #[serde(rename = "m2")]
    SquareMeter,
    /// Linear metres
    #[serde(rename = "ml")]
    LinearMeter,
    /// Unit count
    #[serde(rename = "u")]
    Each,
    /// Lump sum
    #[serde(rename = "forfait")]
    LumpSum,
}

impl Unit {
    /// Short label used in tables and documents
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::SquareMeter => "m²",
            Unit::LinearMeter => "ml",
            Unit::Each => "u",
            Unit::LumpSum => "forfait",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Round a quantity to two decimals, the precision shown on estimates
pub fn round_quantity(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
