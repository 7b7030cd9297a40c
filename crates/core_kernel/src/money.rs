//! Monetary amount bounds
//!
//! Amounts are persisted as `NUMERIC(19, 4)`. Anything finer than four
//! decimal places would be rounded by the database and anything at or above
//! 10^15 would overflow the column, so both are rejected before a write.

use rust_decimal::Decimal;

/// Decimal places kept by storage
pub const MONEY_SCALE: u32 = 4;

/// Integer digits kept by storage
pub const MONEY_INTEGER_DIGITS: u32 = 15;

/// Returns true when the amount is stored without rounding or overflow
///
/// Trailing zeros do not count against the scale, so `10.50000` is accepted.
pub fn is_storable_amount(amount: &Decimal) -> bool {
    let normalized = amount.normalize();
    normalized.scale() <= MONEY_SCALE && normalized.abs() < Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS))
}
