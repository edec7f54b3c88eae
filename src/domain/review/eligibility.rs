//! Review eligibility
//!
//! A review may only be written for a completed stay, by the guest who
//! stayed, once per booking.

use thiserror::Error;

use crate::domain::booking::{Booking, BookingStatus};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Reviews can only be created for completed bookings.")]
    BookingNotCompleted,

    #[error("Only the guest who made the booking can review it.")]
    WrongReviewer,

    #[error("Rating must be between 1 and 5.")]
    RatingRange,

    #[error("Booking {booking_id} has already been reviewed.")]
    DuplicateReview { booking_id: i32 },
}

impl ReviewError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BookingNotCompleted => "booking_not_completed",
            Self::WrongReviewer => "wrong_reviewer",
            Self::RatingRange => "rating_range",
            Self::DuplicateReview { .. } => "duplicate_review",
        }
    }
}

/// Structured input for creating a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub booking_id: i32,
    pub reviewer_id: i32,
    pub rating: i32,
    pub comment: String,
}

/// Run the eligibility checks in order, stopping at the first failure.
///
/// `already_reviewed` tells whether a review for this booking exists.
pub fn check_eligibility(
    booking: &Booking,
    submission: &ReviewSubmission,
    already_reviewed: bool,
) -> Result<(), ReviewError> {
    if booking.status != BookingStatus::Completed {
        return Err(ReviewError::BookingNotCompleted);
    }
    if submission.reviewer_id != booking.guest_id {
        return Err(ReviewError::WrongReviewer);
    }
    if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
        return Err(ReviewError::RatingRange);
    }
    if already_reviewed {
        return Err(ReviewError::DuplicateReview {
            booking_id: booking.id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn booking(status: BookingStatus) -> Booking {
        let check_in = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        Booking {
            id: 3,
            listing_id: 1,
            guest_id: 9,
            check_in,
            check_out: NaiveDate::from_ymd_opt(2026, 8, 4).unwrap(),
            num_guests: 2,
            status,
            price_per_night: Decimal::from(100),
            subtotal: Decimal::from(300),
            total_price: Decimal::from(300),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(reviewer_id: i32, rating: i32) -> ReviewSubmission {
        ReviewSubmission {
            booking_id: 3,
            reviewer_id,
            rating,
            comment: "Lovely stay".into(),
        }
    }

    #[test]
    fn completed_booking_reviewed_by_guest_passes() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(check_eligibility(&b, &submission(9, 5), false), Ok(()));
    }

    #[test]
    fn non_completed_bookings_are_rejected() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(
                check_eligibility(&booking(status), &submission(9, 5), false),
                Err(ReviewError::BookingNotCompleted)
            );
        }
    }

    #[test]
    fn other_user_cannot_review() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(
            check_eligibility(&b, &submission(10, 4), false),
            Err(ReviewError::WrongReviewer)
        );
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(check_eligibility(&b, &submission(9, 1), false), Ok(()));
        assert_eq!(check_eligibility(&b, &submission(9, 5), false), Ok(()));
        assert_eq!(
            check_eligibility(&b, &submission(9, 0), false),
            Err(ReviewError::RatingRange)
        );
        assert_eq!(
            check_eligibility(&b, &submission(9, 6), false),
            Err(ReviewError::RatingRange)
        );
    }

    #[test]
    fn second_review_is_duplicate() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(
            check_eligibility(&b, &submission(9, 5), true),
            Err(ReviewError::DuplicateReview { booking_id: 3 })
        );
    }

    #[test]
    fn checks_short_circuit_in_order() {
        // status before reviewer
        assert_eq!(
            check_eligibility(&booking(BookingStatus::Pending), &submission(10, 9), true),
            Err(ReviewError::BookingNotCompleted)
        );
        // reviewer before rating
        assert_eq!(
            check_eligibility(&booking(BookingStatus::Completed), &submission(10, 9), true),
            Err(ReviewError::WrongReviewer)
        );
        // rating before duplicate
        assert_eq!(
            check_eligibility(&booking(BookingStatus::Completed), &submission(9, 9), true),
            Err(ReviewError::RatingRange)
        );
    }
}
