//! Review DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::ReviewView;
use crate::domain::review::{ReviewFilter, ReviewSubmission};
use crate::interfaces::http::modules::users::UserSummaryDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub id: i32,
    pub listing_id: i32,
    pub listing_title: String,
    pub booking_id: i32,
    pub reviewer: UserSummaryDto,
    pub overall_rating: i32,
    pub comment: String,
    pub is_verified: bool,
    pub host_response: Option<String>,
    pub host_responded_at: Option<DateTime<Utc>>,
    pub has_host_responded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewView> for ReviewDto {
    fn from(v: ReviewView) -> Self {
        let has_host_responded = v.review.has_host_responded();
        let r = v.review;
        Self {
            id: r.id,
            listing_id: r.listing_id,
            listing_title: v.listing_title,
            booking_id: r.booking_id,
            reviewer: v.reviewer.into(),
            overall_rating: r.overall_rating,
            comment: r.comment,
            is_verified: r.is_verified,
            host_response: r.host_response,
            host_responded_at: r.host_responded_at,
            has_host_responded,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewSummaryDto {
    pub id: i32,
    pub listing_title: String,
    pub reviewer_username: String,
    pub overall_rating: i32,
    pub comment: String,
    pub is_verified: bool,
    pub has_host_responded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewView> for ReviewSummaryDto {
    fn from(v: ReviewView) -> Self {
        let has_host_responded = v.review.has_host_responded();
        Self {
            id: v.review.id,
            listing_title: v.listing_title,
            reviewer_username: v.reviewer.username,
            overall_rating: v.review.overall_rating,
            comment: v.review.comment,
            is_verified: v.review.is_verified,
            has_host_responded,
            created_at: v.review.created_at,
        }
    }
}

/// Review submission. Rating bounds are checked by the eligibility rules
/// so that the error order stays stable.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub booking_id: i32,
    pub reviewer_id: i32,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
}

impl From<CreateReviewRequest> for ReviewSubmission {
    fn from(r: CreateReviewRequest) -> Self {
        Self {
            booking_id: r.booking_id,
            reviewer_id: r.reviewer_id,
            rating: r.rating,
            comment: r.comment,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HostResponseRequest {
    #[validate(length(min = 1))]
    pub host_response: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListReviewsParams {
    pub listing_id: Option<i32>,
    pub reviewer_id: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListReviewsParams {
    pub fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            listing_id: self.listing_id,
            reviewer_id: self.reviewer_id,
        }
    }
}
