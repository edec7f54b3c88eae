//! Listing DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::ListingView;
use crate::domain::booking::PriceQuote;
use crate::domain::listing::{ListingDraft, ListingFilter, ListingUpdate, PropertyType};
use crate::domain::DomainResult;
use crate::interfaces::http::modules::users::UserSummaryDto;
use crate::shared::money_display;

/// Full listing with host and rating
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// APARTMENT, HOUSE, CONDO, CABIN, VILLA or OTHER
    pub property_type: String,
    pub property_type_label: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub has_air_conditioning: bool,
    pub has_kitchen: bool,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[schema(value_type = String, example = "120.00")]
    pub price_per_night: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub host: UserSummaryDto,
    pub average_rating: f64,
    pub review_count: u64,
    /// Active listing with an active host
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListingView> for ListingDto {
    fn from(v: ListingView) -> Self {
        let is_available = v.is_available();
        let l = v.listing;
        Self {
            id: l.id,
            title: l.title,
            description: l.description,
            property_type: l.property_type.as_str().to_string(),
            property_type_label: l.property_type.label().to_string(),
            address: l.address,
            city: l.city,
            country: l.country,
            has_air_conditioning: l.has_air_conditioning,
            has_kitchen: l.has_kitchen,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            price_per_night: money_display(l.price_per_night),
            image_url: l.image_url,
            is_active: l.is_active,
            host: v.host.into(),
            average_rating: v.rating.average_rating,
            review_count: v.rating.review_count,
            is_available,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Listing row for list endpoints and embedding in bookings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingSummaryDto {
    pub id: i32,
    pub title: String,
    pub property_type: String,
    pub city: String,
    pub country: String,
    #[schema(value_type = String, example = "120.00")]
    pub price_per_night: Decimal,
    pub image_url: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub host_username: String,
    pub average_rating: f64,
    pub review_count: u64,
    pub is_active: bool,
}

impl From<ListingView> for ListingSummaryDto {
    fn from(v: ListingView) -> Self {
        let l = v.listing;
        Self {
            id: l.id,
            title: l.title,
            property_type: l.property_type.as_str().to_string(),
            city: l.city,
            country: l.country,
            price_per_night: money_display(l.price_per_night),
            image_url: l.image_url,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            host_username: v.host.username,
            average_rating: v.rating.average_rating,
            review_count: v.rating.review_count,
            is_active: l.is_active,
        }
    }
}

/// Create listing request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    pub host_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "APARTMENT")]
    pub property_type: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[serde(default)]
    pub has_air_conditioning: bool,
    #[serde(default)]
    pub has_kitchen: bool,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[schema(value_type = String, example = "120.00")]
    pub price_per_night: Decimal,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl CreateListingRequest {
    pub fn into_draft(self) -> DomainResult<ListingDraft> {
        Ok(ListingDraft {
            property_type: self.property_type.parse()?,
            host_id: self.host_id,
            title: self.title,
            description: self.description,
            address: self.address,
            city: self.city,
            country: self.country,
            has_air_conditioning: self.has_air_conditioning,
            has_kitchen: self.has_kitchen,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            price_per_night: self.price_per_night,
            image_url: self.image_url.filter(|u| !u.is_empty()),
        })
    }
}

/// Partial listing update. Absent fields are left unchanged;
/// an empty `image_url` clears the image.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    pub has_air_conditioning: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub price_per_night: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateListingRequest {
    pub fn into_update(self) -> DomainResult<ListingUpdate> {
        let property_type = self
            .property_type
            .as_deref()
            .map(str::parse::<PropertyType>)
            .transpose()?;
        Ok(ListingUpdate {
            title: self.title,
            description: self.description,
            property_type,
            address: self.address,
            city: self.city,
            country: self.country,
            has_air_conditioning: self.has_air_conditioning,
            has_kitchen: self.has_kitchen,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            price_per_night: self.price_per_night,
            image_url: self.image_url,
            is_active: self.is_active,
        })
    }
}

/// List listings query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListListingsParams {
    /// Exact city, case-insensitive
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub host_id: Option<i32>,
    /// Defaults to active listings only; pass `false` for deactivated ones
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListListingsParams {
    pub fn filter(&self) -> DomainResult<ListingFilter> {
        Ok(ListingFilter {
            city: self.city.clone().filter(|c| !c.trim().is_empty()),
            property_type: self
                .property_type
                .as_deref()
                .map(str::parse::<PropertyType>)
                .transpose()?,
            host_id: self.host_id,
            is_active: Some(self.active.unwrap_or(true)),
        })
    }
}

/// Price quote request for a prospective stay
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub num_guests: i32,
}

fn default_guests() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteDto {
    pub listing_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_nights: i64,
    #[schema(value_type = String)]
    pub price_per_night: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

impl QuoteDto {
    pub fn new(listing_id: i32, check_in: NaiveDate, check_out: NaiveDate, q: PriceQuote) -> Self {
        Self {
            listing_id,
            check_in,
            check_out,
            num_nights: q.num_nights,
            price_per_night: money_display(q.price_per_night),
            subtotal: money_display(q.subtotal),
            total_price: money_display(q.total_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_property_type_is_rejected() {
        let params = ListListingsParams {
            property_type: Some("castle".into()),
            ..Default::default()
        };
        assert!(params.filter().is_err());
    }

    #[test]
    fn listing_filter_defaults_to_active() {
        let filter = ListListingsParams::default().filter().unwrap();
        assert_eq!(filter.is_active, Some(true));

        let params = ListListingsParams {
            active: Some(false),
            property_type: Some("villa".into()),
            ..Default::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.is_active, Some(false));
        assert_eq!(filter.property_type, Some(PropertyType::Villa));
    }
}
