//! Money formatting

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol shown in front of amounts
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with two decimals, e.g. `12.50`
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Format an amount as currency, e.g. `₹12.50`
pub fn format_money(value: Decimal) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(value))
}
