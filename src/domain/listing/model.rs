//! Listing domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::DomainError;

/// Kind of property on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Cabin,
    Villa,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        Self::Apartment,
        Self::House,
        Self::Condo,
        Self::Cabin,
        Self::Villa,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "APARTMENT",
            Self::House => "HOUSE",
            Self::Condo => "CONDO",
            Self::Cabin => "CABIN",
            Self::Villa => "VILLA",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Condo => "Condominium",
            Self::Cabin => "Cabin",
            Self::Villa => "Villa",
            Self::Other => "Other",
        }
    }
}

impl FromStr for PropertyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::Validation(format!("Unknown property type: {s}")))
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A property offered by a host
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i32,
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
    /// Current nightly rate; bookings copy it at creation
    pub price_per_night: Decimal,
    pub image_url: Option<String>,
    /// Soft-delete flag
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Bookable from a guest's point of view: the listing and its host are both active.
    pub fn is_available(&self, host_active: bool) -> bool {
        self.is_active && host_active
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_codes() {
        assert_eq!("condo".parse::<PropertyType>().unwrap(), PropertyType::Condo);
        assert_eq!("VILLA".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert!("castle".parse::<PropertyType>().is_err());
        assert_eq!(PropertyType::Condo.label(), "Condominium");
    }

    #[test]
    fn availability_needs_active_listing_and_host() {
        let now = Utc::now();
        let mut listing = Listing {
            id: 1,
            host_id: 1,
            title: "Loft".into(),
            description: String::new(),
            property_type: PropertyType::Apartment,
            address: "1 Main St".into(),
            city: "Lagos".into(),
            country: "Nigeria".into(),
            has_air_conditioning: true,
            has_kitchen: true,
            bedrooms: 1,
            bathrooms: 1,
            price_per_night: Decimal::from(90),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(listing.is_available(true));
        assert!(!listing.is_available(false));

        listing.deactivate(now);
        assert!(!listing.is_available(true));
    }
}
