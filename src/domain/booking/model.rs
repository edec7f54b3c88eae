//! Booking domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::error::BookingError;
use super::pricing::{nights_between, PriceQuote};
use super::validation::BookingRequest;

/// Booking status
///
/// Transitions are not guarded here: any status may be replaced by any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookingStatus {
    /// Requested by the guest, not yet confirmed
    #[default]
    Pending,
    /// Confirmed by the host
    Confirmed,
    /// Cancelled by guest or host
    Cancelled,
    /// Stay finished
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BookingError::UnknownStatus(s.to_string()))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation of a listing by a guest for `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub listing_id: i32,
    pub guest_id: i32,
    pub check_in: NaiveDate,
    /// Exclusive: the guest leaves on this day
    pub check_out: NaiveDate,
    pub num_guests: i32,
    pub status: BookingStatus,
    /// Locked from the listing at creation time
    pub price_per_night: Decimal,
    pub subtotal: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a pending booking from a validated request and its price quote.
    /// The id is assigned by the repository on save.
    pub fn pending(request: &BookingRequest, quote: PriceQuote, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            listing_id: request.listing_id,
            guest_id: request.guest_id,
            check_in: request.check_in,
            check_out: request.check_out,
            num_guests: request.num_guests,
            status: BookingStatus::Pending,
            price_per_night: quote.price_per_night,
            subtotal: quote.subtotal,
            total_price: quote.total_price,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn num_nights(&self) -> i64 {
        nights_between(self.check_in, self.check_out)
    }

    /// Days left before check-in; 0 on or after the check-in day.
    pub fn days_until_checkin(&self, today: NaiveDate) -> i64 {
        (self.check_in - today).num_days().max(0)
    }

    /// Confirmed and `today` within `[check_in, check_out]`, both ends inclusive.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status == BookingStatus::Confirmed && self.check_in <= today && today <= self.check_out
    }

    /// Cancellation closes two days before check-in.
    pub fn can_cancel(&self, today: NaiveDate) -> bool {
        self.status != BookingStatus::Cancelled && self.days_until_checkin(today) > 2
    }

    /// Whether `[check_in, check_out)` intersects this booking's stay.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && check_in < self.check_out
    }

    pub fn set_status(&mut self, status: BookingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Cancel if the cancellation window is still open.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), BookingError> {
        if !self.can_cancel(now.date_naive()) {
            return Err(BookingError::CancellationClosed { booking_id: self.id });
        }
        self.set_status(BookingStatus::Cancelled, now);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
