//! Listing input and field rules

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{Listing, PropertyType};
use crate::domain::{DomainError, DomainResult};
use crate::shared::MONEY_SCALE;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_ADDRESS_LEN: usize = 255;
pub const MAX_CITY_LEN: usize = 100;
pub const MAX_COUNTRY_LEN: usize = 100;
/// Ten digits with two decimal places: 99,999,999.99.
pub const MAX_PRICE_PER_NIGHT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Fields supplied when creating a listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub host_id: i32,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub address: String,
    pub city: String,
    pub country: String,
    pub has_air_conditioning: bool,
    pub has_kitchen: bool,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub price_per_night: Decimal,
    pub image_url: Option<String>,
}

impl ListingDraft {
    /// Validate and turn into an unsaved, active listing.
    pub fn into_listing(self, now: DateTime<Utc>) -> DomainResult<Listing> {
        let listing = Listing {
            id: 0,
            host_id: self.host_id,
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            address: self.address,
            city: self.city,
            country: self.country,
            has_air_conditioning: self.has_air_conditioning,
            has_kitchen: self.has_kitchen,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            price_per_night: self.price_per_night,
            image_url: self.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        validate_listing(&listing)?;
        Ok(listing)
    }
}

/// Partial update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub has_air_conditioning: Option<bool>,
    pub has_kitchen: Option<bool>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price_per_night: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ListingUpdate {
    /// Apply onto `listing` and re-check every field rule. On error the
    /// listing is left untouched.
    pub fn apply(self, listing: &mut Listing, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = listing.clone();
        if let Some(v) = self.title {
            next.title = v;
        }
        if let Some(v) = self.description {
            next.description = v;
        }
        if let Some(v) = self.property_type {
            next.property_type = v;
        }
        if let Some(v) = self.address {
            next.address = v;
        }
        if let Some(v) = self.city {
            next.city = v;
        }
        if let Some(v) = self.country {
            next.country = v;
        }
        if let Some(v) = self.has_air_conditioning {
            next.has_air_conditioning = v;
        }
        if let Some(v) = self.has_kitchen {
            next.has_kitchen = v;
        }
        if let Some(v) = self.bedrooms {
            next.bedrooms = v;
        }
        if let Some(v) = self.bathrooms {
            next.bathrooms = v;
        }
        if let Some(v) = self.price_per_night {
            next.price_per_night = v;
        }
        if let Some(v) = self.image_url {
            next.image_url = Some(v).filter(|url| !url.is_empty());
        }
        if let Some(v) = self.is_active {
            next.is_active = v;
        }
        validate_listing(&next)?;
        next.updated_at = now;
        *listing = next;
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required.")));
    }
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters."
        )));
    }
    Ok(())
}

pub fn validate_listing(listing: &Listing) -> DomainResult<()> {
    check_len("Title", &listing.title, MAX_TITLE_LEN)?;
    check_len("Address", &listing.address, MAX_ADDRESS_LEN)?;
    check_len("City", &listing.city, MAX_CITY_LEN)?;
    check_len("Country", &listing.country, MAX_COUNTRY_LEN)?;

    if listing.price_per_night <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "Price per night must be greater than 0.".into(),
        ));
    }
    if listing.price_per_night > MAX_PRICE_PER_NIGHT {
        return Err(DomainError::Validation(format!(
            "Price per night must be at most {MAX_PRICE_PER_NIGHT}."
        )));
    }
    if listing.price_per_night.normalize().scale() > MONEY_SCALE {
        return Err(DomainError::Validation(
            "Price per night must have at most 2 decimal places.".into(),
        ));
    }
    if listing.bedrooms < 1 {
        return Err(DomainError::Validation(
            "Listing must have at least 1 bedroom.".into(),
        ));
    }
    if listing.bathrooms < 1 {
        return Err(DomainError::Validation(
            "Listing must have at least 1 bathroom.".into(),
        ));
    }
    Ok(())
}
