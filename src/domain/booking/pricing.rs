//! Stay pricing
//!
//! A quote is the listing's current nightly rate multiplied by the number of
//! nights. No cleaning fees, taxes or discounts are applied, so the total is
//! always equal to the subtotal.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BookingError;
use crate::shared::round_money;

/// Price figures locked onto a booking at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub price_per_night: Decimal,
    pub num_nights: i64,
    pub subtotal: Decimal,
    pub total_price: Decimal,
}

/// Nights between two dates; check-out day is not a night.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Price a stay at `price_per_night`.
///
/// Callers are expected to have validated the range already; a zero or
/// negative night count is still reported as [`BookingError::InvalidRange`].
pub fn quote(
    price_per_night: Decimal,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<PriceQuote, BookingError> {
    let num_nights = nights_between(check_in, check_out);
    if num_nights <= 0 {
        return Err(BookingError::InvalidRange { nights: num_nights });
    }

    let price_per_night = round_money(price_per_night);
    let subtotal = price_per_night
        .checked_mul(Decimal::from(num_nights))
        .ok_or(BookingError::PriceOverflow)?;

    Ok(PriceQuote {
        price_per_night,
        num_nights,
        subtotal,
        total_price: subtotal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    #[test]
    fn three_nights_at_one_hundred() {
        let q = quote(Decimal::from(100), day(10), day(13)).unwrap();
        assert_eq!(q.num_nights, 3);
        assert_eq!(q.subtotal, Decimal::from(300));
        assert_eq!(q.total_price, Decimal::from(300));
    }

    #[test]
    fn total_always_equals_subtotal() {
        let price = Decimal::new(8_999, 2); // 89.99
        for nights in 1..=30i64 {
            let q = quote(price, day(1), day(1) + Duration::days(nights)).unwrap();
            assert_eq!(q.num_nights, nights);
            assert_eq!(q.subtotal, price * Decimal::from(nights));
            assert_eq!(q.total_price, q.subtotal);
        }
    }

    #[test]
    fn spans_month_boundary() {
        let check_in = NaiveDate::from_ymd_opt(2026, 12, 30).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2027, 1, 2).unwrap();
        let q = quote(Decimal::new(5_050, 2), check_in, check_out).unwrap();
        assert_eq!(q.num_nights, 3);
        assert_eq!(q.subtotal, Decimal::new(15_150, 2));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        assert_eq!(
            quote(Decimal::MAX, day(10), day(13)),
            Err(BookingError::PriceOverflow)
        );
    }

    #[test]
    fn zero_nights_is_invalid_range() {
        assert_eq!(
            quote(Decimal::from(100), day(5), day(5)),
            Err(BookingError::InvalidRange { nights: 0 })
        );
    }

    #[test]
    fn reversed_range_is_invalid_range() {
        assert_eq!(
            quote(Decimal::from(100), day(8), day(5)),
            Err(BookingError::InvalidRange { nights: -3 })
        );
    }
}
