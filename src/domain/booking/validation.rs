//! Booking request validation

use chrono::NaiveDate;

use super::error::BookingError;

/// Structured input for creating a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub listing_id: i32,
    pub guest_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_guests: i32,
}

/// Check a booking request against `today`.
///
/// Rules are applied in order and the first failure wins:
/// check-out after check-in, check-in not in the past, at least one guest.
/// Listing capacity is not checked.
pub fn validate_request(request: &BookingRequest, today: NaiveDate) -> Result<(), BookingError> {
    validate_stay(request.check_in, request.check_out, request.num_guests, today)
}

/// Same rules as [`validate_request`] without the party identities.
pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    num_guests: i32,
    today: NaiveDate,
) -> Result<(), BookingError> {
    if check_out <= check_in {
        return Err(BookingError::DateOrder);
    }
    if check_in < today {
        return Err(BookingError::PastDate);
    }
    if num_guests < 1 {
        return Err(BookingError::GuestCount);
    }
    Ok(())
}
