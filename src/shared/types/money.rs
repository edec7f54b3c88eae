//! Money helpers
//!
//! Amounts travel through the domain as [`Decimal`] with two decimal places
//! and are stored as integer minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to currency precision, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to currency precision and pin the scale, so `100` renders as `100.00`.
pub fn money_display(amount: Decimal) -> Decimal {
    let mut rounded = round_money(amount);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Convert an amount to minor units for storage.
///
/// Returns `None` when the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Convert stored minor units back into a two-place decimal.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_trip_two_places() {
        let price = Decimal::new(12_550, 2); // 125.50
        assert_eq!(to_minor_units(price), Some(12_550));
        assert_eq!(from_minor_units(12_550), price);
    }

    #[test]
    fn extra_precision_is_rounded_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::new(10_005, 3)), Some(1_001)); // 10.005
        assert_eq!(to_minor_units(Decimal::new(10_004, 3)), Some(1_000)); // 10.004
    }

    #[test]
    fn display_always_has_two_places() {
        assert_eq!(money_display(Decimal::from(300)).to_string(), "300.00");
        assert_eq!(money_display(Decimal::new(125_5, 1)).to_string(), "125.50");
    }

    #[test]
    fn out_of_range_amounts_have_no_minor_units() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
        assert_eq!(to_minor_units(Decimal::from(i64::MAX)), None);
    }

    #[test]
    fn whole_numbers_get_two_places() {
        assert_eq!(to_minor_units(Decimal::from(300)), Some(30_000));
        assert_eq!(from_minor_units(30_000), Decimal::from(300));
    }
}
