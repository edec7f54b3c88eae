//! Fixtures shared by the service and router tests

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::listing::{Listing, ListingDraft, PropertyType};
use crate::domain::{RepositoryProvider, User};
use crate::infrastructure::storage::InMemoryStorage;
use crate::shared::{FixedClock, SharedClock};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

pub fn day(offset: i64) -> NaiveDate {
    today() + Duration::days(offset)
}

pub fn clock() -> SharedClock {
    Arc::new(FixedClock::on(today()))
}

pub fn user(name: &str) -> User {
    let now = Utc::now();
    User {
        id: 0,
        username: name.into(),
        email: format!("{name}@example.com"),
        first_name: name.into(),
        last_name: "User".into(),
        password_hash: String::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn draft(host_id: i32, price: i64) -> ListingDraft {
    ListingDraft {
        host_id,
        title: "Canal loft".into(),
        description: String::new(),
        property_type: PropertyType::Apartment,
        address: "1 Canal St".into(),
        city: "Amsterdam".into(),
        country: "Netherlands".into(),
        has_air_conditioning: false,
        has_kitchen: true,
        bedrooms: 1,
        bathrooms: 1,
        price_per_night: Decimal::from(price),
        image_url: None,
    }
}

/// Store with one host, one guest and one 100/night listing
pub struct Fixture {
    pub store: Arc<InMemoryStorage>,
    pub host: User,
    pub guest: User,
    pub listing: Listing,
}

pub async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStorage::new());
    let host = store.users().create_user(user("host1")).await.unwrap();
    let guest = store.users().create_user(user("guest1")).await.unwrap();
    let listing = draft(host.id, 100).into_listing(Utc::now()).unwrap();
    let listing = store.listings().save(listing).await.unwrap();
    Fixture {
        store,
        host,
        guest,
        listing,
    }
}
