//! Display formatting. Never feed these strings back into arithmetic.

use rust_decimal::Decimal;

use bullion_core::Money;

/// en-US USD text: `$`, thousands separators, two decimals.
pub fn format_currency(amount: Money) -> String {
    amount.format_usd()
}

/// Two decimals, no symbol (spot price banner).
pub fn format_price(amount: Decimal) -> String {
    Money::new(amount).to_plain_string()
}
