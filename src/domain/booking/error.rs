//! Booking rule violations

use chrono::NaiveDate;
use thiserror::Error;

/// Why a booking request (or a change to a booking) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Check-out date must be after check-in date.")]
    DateOrder,

    #[error("Check-in date cannot be in the past.")]
    PastDate,

    #[error("Number of guests must be at least 1.")]
    GuestCount,

    /// Pricing was asked for a stay of zero or negative nights.
    #[error("Invalid date range: {nights} night(s)")]
    InvalidRange { nights: i64 },

    /// The rate times the night count does not fit a decimal.
    #[error("Stay price is out of range.")]
    PriceOverflow,

    #[error("Booking {booking_id} can no longer be cancelled")]
    CancellationClosed { booking_id: i32 },

    #[error("Listing {listing_id} is already booked between {check_in} and {check_out}")]
    Conflict {
        listing_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
}

impl BookingError {
    /// Short machine-readable label, used as a metrics dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::DateOrder => "date_order",
            Self::PastDate => "past_date",
            Self::GuestCount => "guest_count",
            Self::InvalidRange { .. } => "invalid_range",
            Self::PriceOverflow => "price_overflow",
            Self::CancellationClosed { .. } => "cancellation_closed",
            Self::Conflict { .. } => "conflict",
            Self::UnknownStatus(_) => "unknown_status",
        }
    }
}
