//! USD money amounts backed by a decimal type.
//!
//! Amounts keep full precision through arithmetic; rounding to cents only
//! happens when a value is rendered for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Number of minor-unit digits shown for USD.
pub const CENT_SCALE: u32 = 2;

/// A USD amount.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from minor units (cents).
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, CENT_SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply by a unit count; `None` when the product leaves the decimal range.
    pub fn checked_times(self, units: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(units)).map(Self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Round half away from zero to whole cents (the en-US display convention).
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Two-decimal rendering without symbol or grouping, e.g. `"90.00"`.
    pub fn to_plain_string(self) -> String {
        let mut rounded = self.round_to_cents().0;
        rounded.rescale(CENT_SCALE);
        if rounded.is_zero() {
            // Avoid "-0.00" after rounding a tiny negative value.
            rounded = rounded.abs();
        }
        rounded.to_string()
    }

    /// en-US currency rendering: `$` symbol, thousands separators, exactly two
    /// decimals (`1234.5` renders as `"$1,234.50"`).
    pub fn format_usd(self) -> String {
        let rounded = self.round_to_cents();
        let negative = rounded.is_negative();
        let plain = Money(rounded.0.abs()).to_plain_string();

        let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut out = String::with_capacity(plain.len() + whole.len() / 3 + 2);
        if negative {
            out.push('-');
        }
        out.push('$');
        out.push_str(&group_thousands(whole));
        out.push('.');
        out.push_str(cents);
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format_usd())
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
