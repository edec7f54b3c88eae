//! Review domain entity

use chrono::{DateTime, Utc};

use super::eligibility::ReviewSubmission;
use crate::domain::booking::{Booking, BookingStatus};

/// Rating and comment left by a guest for a completed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub listing_id: i32,
    /// At most one review per booking
    pub booking_id: i32,
    pub reviewer_id: i32,
    /// 1..=5
    pub overall_rating: i32,
    pub comment: String,
    /// Set when the review comes from a completed booking
    pub is_verified: bool,
    pub host_response: Option<String>,
    pub host_responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Build a review for `booking`. Eligibility must have been checked.
    pub fn for_booking(booking: &Booking, submission: ReviewSubmission, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            listing_id: booking.listing_id,
            booking_id: booking.id,
            reviewer_id: submission.reviewer_id,
            overall_rating: submission.rating,
            comment: submission.comment,
            is_verified: booking.status == BookingStatus::Completed,
            host_response: None,
            host_responded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_host_responded(&self) -> bool {
        self.host_response.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Record (or replace) the host's reply.
    pub fn respond(&mut self, response: impl Into<String>, now: DateTime<Utc>) {
        self.host_response = Some(response.into());
        self.host_responded_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn completed_booking() -> Booking {
        Booking {
            id: 5,
            listing_id: 2,
            guest_id: 8,
            check_in: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 6, 3).unwrap(),
            num_guests: 1,
            status: BookingStatus::Completed,
            price_per_night: Decimal::from(80),
            subtotal: Decimal::from(160),
            total_price: Decimal::from(160),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review() -> Review {
        let submission = ReviewSubmission {
            booking_id: 5,
            reviewer_id: 8,
            rating: 5,
            comment: "Great".into(),
        };
        Review::for_booking(&completed_booking(), submission, Utc::now())
    }

    #[test]
    fn review_from_completed_booking_is_verified() {
        let r = review();
        assert!(r.is_verified);
        assert_eq!(r.listing_id, 2);
        assert_eq!(r.booking_id, 5);
        assert!(!r.has_host_responded());
    }

    #[test]
    fn empty_response_does_not_count() {
        let mut r = review();
        r.respond("", Utc::now());
        assert!(!r.has_host_responded());
    }

    #[test]
    fn respond_stamps_time_and_can_repeat() {
        let mut r = review();
        let first = Utc::now();
        r.respond("Thanks!", first);
        assert!(r.has_host_responded());
        assert_eq!(r.host_responded_at, Some(first));

        let later = first + chrono::Duration::hours(1);
        r.respond("Thanks again!", later);
        assert_eq!(r.host_response.as_deref(), Some("Thanks again!"));
        assert_eq!(r.host_responded_at, Some(later));
    }
}
