//! Booking DTOs
//!
//! Derived fields (`days_until_checkin`, `is_active`, `can_cancel`) depend on
//! the current day, so conversions take `today` explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::BookingView;
use crate::domain::booking::{BookingFilter, BookingRequest};
use crate::domain::{BookingStatus, DomainResult};
use crate::interfaces::http::modules::listings::ListingSummaryDto;
use crate::interfaces::http::modules::users::UserSummaryDto;
use crate::shared::money_display;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub listing_id: i32,
    pub listing_detail: ListingSummaryDto,
    pub guest: UserSummaryDto,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_guests: i32,
    /// PENDING, CONFIRMED, CANCELLED or COMPLETED
    pub status: String,
    #[schema(value_type = String)]
    pub price_per_night: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub num_nights: i64,
    pub days_until_checkin: i64,
    /// Confirmed and currently in progress
    pub is_active: bool,
    pub can_cancel: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingDto {
    pub fn from_view(v: BookingView, today: NaiveDate) -> Self {
        let b = v.booking;
        Self {
            id: b.id,
            listing_id: b.listing_id,
            listing_detail: v.listing.into(),
            guest: v.guest.into(),
            num_nights: b.num_nights(),
            days_until_checkin: b.days_until_checkin(today),
            is_active: b.is_active(today),
            can_cancel: b.can_cancel(today),
            check_in: b.check_in,
            check_out: b.check_out,
            num_guests: b.num_guests,
            status: b.status.as_str().to_string(),
            price_per_night: money_display(b.price_per_night),
            subtotal: money_display(b.subtotal),
            total_price: money_display(b.total_price),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Compact booking row for list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingSummaryDto {
    pub id: i32,
    pub listing_title: String,
    pub guest_username: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_nights: i64,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookingView> for BookingSummaryDto {
    fn from(v: BookingView) -> Self {
        let b = v.booking;
        Self {
            id: b.id,
            listing_title: v.listing.listing.title,
            guest_username: v.guest.username,
            num_nights: b.num_nights(),
            check_in: b.check_in,
            check_out: b.check_out,
            total_price: money_display(b.total_price),
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub listing_id: i32,
    pub guest_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub num_guests: i32,
}

fn default_guests() -> i32 {
    1
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            listing_id: r.listing_id,
            guest_id: r.guest_id,
            check_in: r.check_in,
            check_out: r.check_out,
            num_guests: r.num_guests,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "CONFIRMED")]
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBookingsParams {
    pub guest_id: Option<i32>,
    pub listing_id: Option<i32>,
    /// Case-insensitive status name
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListBookingsParams {
    pub fn filter(&self) -> DomainResult<BookingFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<BookingStatus>)
            .transpose()?;
        Ok(BookingFilter {
            guest_id: self.guest_id,
            listing_id: self.listing_id,
            status,
        })
    }
}
