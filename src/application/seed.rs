//! Sample data for local development
//!
//! Creates hosts, guests, listings across a handful of cities, bookings in
//! every status and reviews for most completed stays. Seeded bookings are
//! written directly so past stays can exist.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::booking::{quote, BookingRequest};
use crate::domain::listing::{ListingDraft, PropertyType};
use crate::domain::review::ReviewSubmission;
use crate::domain::{Booking, BookingStatus, DomainError, DomainResult, Listing, RepositoryProvider, Review, User};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::SharedClock;

pub const SEED_PASSWORD: &str = "password123";
pub const HOST_COUNT: usize = 5;
pub const GUEST_COUNT: usize = 10;
pub const LISTING_COUNT: usize = 30;
pub const BOOKING_COUNT: usize = 50;

const CITIES: [(&str, &str); 10] = [
    ("New York", "USA"),
    ("Paris", "France"),
    ("Tokyo", "Japan"),
    ("London", "UK"),
    ("Barcelona", "Spain"),
    ("Dubai", "UAE"),
    ("Sydney", "Australia"),
    ("Rome", "Italy"),
    ("Bangkok", "Thailand"),
    ("Istanbul", "Turkey"),
];

const PROPERTY_TYPES: [PropertyType; 5] = [
    PropertyType::Apartment,
    PropertyType::House,
    PropertyType::Condo,
    PropertyType::Cabin,
    PropertyType::Villa,
];

const ADJECTIVES: [&str; 8] = [
    "Cozy", "Luxury", "Modern", "Charming", "Spacious", "Beautiful", "Elegant", "Stunning",
];
const NOUNS: [&str; 7] = ["Studio", "Apartment", "Loft", "Villa", "House", "Suite", "Retreat"];
const STREETS: [&str; 5] = ["Main", "Oak", "Maple", "Park", "Lake"];

const POSITIVE: [&str; 5] = [
    "Amazing place! Highly recommend.",
    "The host was very welcoming and the place was spotless.",
    "Perfect location and great amenities. Will book again!",
    "Exceeded our expectations. Beautiful and comfortable.",
    "Great value for money. Loved our stay!",
];
const NEUTRAL: [&str; 4] = [
    "Nice place, but could use some updates.",
    "Decent stay. Met our basic needs.",
    "Good location, average amenities.",
    "It was okay. Nothing special but not bad either.",
];
const NEGATIVE: [&str; 4] = [
    "Not as described. Disappointed with cleanliness.",
    "Location was inconvenient and noisy.",
    "Poor communication with host. Would not recommend.",
    "Overpriced for what you get.",
];
const HOST_RESPONSES: [&str; 5] = [
    "Thank you for your wonderful review! We're glad you enjoyed your stay.",
    "We appreciate your feedback and hope to host you again soon!",
    "Thanks for staying with us! Your feedback means a lot.",
    "We're sorry to hear about your experience. We're working to improve.",
    "Thank you for your honest feedback. We'll address these issues.",
];

/// Counts of what a seeding run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub cleared_listings: u64,
    pub hosts: usize,
    pub guests: usize,
    pub listings: usize,
    pub bookings: usize,
    pub reviews: usize,
    pub host_responses: usize,
}

pub struct Seeder {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    rng: StdRng,
    password_hash: Option<String>,
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Seeder {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self {
            repos,
            clock,
            rng: StdRng::from_entropy(),
            password_hash: None,
        }
    }

    /// Deterministic output for a given seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Use a precomputed hash of [`SEED_PASSWORD`]
    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }

    pub async fn run(&mut self, clear: bool) -> DomainResult<SeedReport> {
        let mut report = SeedReport::default();

        if clear {
            info!("Clearing existing listing data");
            self.repos.reviews().delete_all().await?;
            self.repos.bookings().delete_all().await?;
            report.cleared_listings = self.repos.listings().delete_all().await?;
        }

        let hosts = self.users("host", HOST_COUNT).await?;
        let guests = self.users("guest", GUEST_COUNT).await?;
        report.hosts = hosts.len();
        report.guests = guests.len();
        info!(hosts = hosts.len(), guests = guests.len(), "Seeded users");

        let listings = self.listings(&hosts).await?;
        report.listings = listings.len();
        info!(count = listings.len(), "Seeded listings");

        let bookings = self.bookings(&listings, &guests).await?;
        report.bookings = bookings.len();
        info!(count = bookings.len(), "Seeded bookings");

        let (reviews, responses) = self.reviews(&bookings).await?;
        report.reviews = reviews;
        report.host_responses = responses;
        info!(reviews, responses, "Seeded reviews");

        Ok(report)
    }

    fn password_hash(&mut self) -> DomainResult<String> {
        if let Some(hash) = &self.password_hash {
            return Ok(hash.clone());
        }
        let hash = hash_password(SEED_PASSWORD)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        self.password_hash = Some(hash.clone());
        Ok(hash)
    }

    /// `prefix1..=prefixN`, reusing accounts that already exist.
    async fn users(&mut self, prefix: &str, count: usize) -> DomainResult<Vec<User>> {
        let mut users = Vec::with_capacity(count);
        for i in 1..=count {
            let username = format!("{prefix}{i}");
            if let Some(existing) = self.repos.users().get_user_by_username(&username).await? {
                users.push(existing);
                continue;
            }
            let now = self.clock.now();
            let user = User {
                id: 0,
                email: format!("{username}@example.com"),
                first_name: capitalize(&username),
                last_name: "User".into(),
                password_hash: self.password_hash()?,
                is_active: true,
                created_at: now,
                updated_at: now,
                username,
            };
            users.push(self.repos.users().create_user(user).await?);
        }
        Ok(users)
    }

    async fn listings(&mut self, hosts: &[User]) -> DomainResult<Vec<Listing>> {
        let mut listings = Vec::with_capacity(LISTING_COUNT);
        for _ in 0..LISTING_COUNT {
            let rng = &mut self.rng;
            let (city, country) = *pick(rng, &CITIES);
            let title = format!("{} {} in {}", pick(rng, &ADJECTIVES), pick(rng, &NOUNS), city);
            let draft = ListingDraft {
                host_id: pick(rng, hosts).id,
                description: format!(
                    "Experience the best of {city} in this {}. Perfect for travelers looking for \
                     comfort and convenience. Close to major attractions and public transportation.",
                    title.to_lowercase()
                ),
                title,
                property_type: *pick(rng, &PROPERTY_TYPES),
                address: format!("{} {} Street", rng.gen_range(1..=999), pick(rng, &STREETS)),
                city: city.into(),
                country: country.into(),
                has_air_conditioning: rng.gen_bool(0.5),
                has_kitchen: rng.gen_bool(2.0 / 3.0),
                bedrooms: rng.gen_range(1..=4),
                bathrooms: rng.gen_range(1..=3),
                price_per_night: Decimal::from(rng.gen_range(50..=500)),
                image_url: None,
            };
            let listing = draft.into_listing(self.clock.now())?;
            listings.push(self.repos.listings().save(listing).await?);
        }
        Ok(listings)
    }

    /// Stay dates by status: completed in the past, confirmed and pending
    /// ahead, cancelled anywhere within a month either side.
    fn stay_for(&mut self, status: BookingStatus, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let rng = &mut self.rng;
        let (offset, nights) = match status {
            BookingStatus::Completed => (-rng.gen_range(30..=180), rng.gen_range(2..=14)),
            BookingStatus::Confirmed => (rng.gen_range(5..=60), rng.gen_range(2..=14)),
            BookingStatus::Pending => (rng.gen_range(10..=30), rng.gen_range(2..=7)),
            BookingStatus::Cancelled => (rng.gen_range(-30..=30), rng.gen_range(2..=7)),
        };
        let check_in = today + Duration::days(offset);
        (check_in, check_in + Duration::days(nights))
    }

    async fn bookings(&mut self, listings: &[Listing], guests: &[User]) -> DomainResult<Vec<Booking>> {
        let today = self.clock.today();
        let mut bookings = Vec::with_capacity(BOOKING_COUNT);
        for _ in 0..BOOKING_COUNT {
            let listing = pick(&mut self.rng, listings).clone();
            let guest_id = pick(&mut self.rng, guests).id;
            let status = *pick(&mut self.rng, &BookingStatus::ALL);
            let (check_in, check_out) = self.stay_for(status, today);

            let request = BookingRequest {
                listing_id: listing.id,
                guest_id,
                check_in,
                check_out,
                num_guests: self.rng.gen_range(1..=4),
            };
            let price = quote(listing.price_per_night, check_in, check_out)?;
            let mut booking = Booking::pending(&request, price, self.clock.now());
            booking.status = status;
            bookings.push(self.repos.bookings().save(booking).await?);
        }
        Ok(bookings)
    }

    /// Reviews for 70% of completed bookings, host replies on about half.
    async fn reviews(&mut self, bookings: &[Booking]) -> DomainResult<(usize, usize)> {
        let completed: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .collect();
        let amount = completed.len() * 7 / 10;
        let chosen: Vec<Booking> = completed
            .choose_multiple(&mut self.rng, amount)
            .map(|b| (*b).clone())
            .collect();

        let mut responses = 0;
        for booking in &chosen {
            let rating = self.rng.gen_range(1..=5);
            let comment = match rating {
                4..=5 => *pick(&mut self.rng, &POSITIVE),
                3 => *pick(&mut self.rng, &NEUTRAL),
                _ => *pick(&mut self.rng, &NEGATIVE),
            };
            let submission = ReviewSubmission {
                booking_id: booking.id,
                reviewer_id: booking.guest_id,
                rating,
                comment: comment.into(),
            };
            let mut review = Review::for_booking(booking, submission, self.clock.now());

            if self.rng.gen_bool(0.5) {
                let when = self.clock.now() - Duration::days(self.rng.gen_range(1..=30));
                review.respond(*pick(&mut self.rng, &HOST_RESPONSES), when);
                review.updated_at = review.created_at;
                responses += 1;
            }
            self.repos.reviews().save(review).await?;
        }
        Ok((chosen.len(), responses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::clock;
    use crate::domain::booking::BookingFilter;
    use crate::domain::listing::ListingFilter;
    use crate::domain::review::ReviewFilter;
    use crate::infrastructure::crypto::password::hash_password_with_cost;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::shared::PaginationParams;

    fn seeder(store: Arc<InMemoryStorage>) -> Seeder {
        let hash = hash_password_with_cost(SEED_PASSWORD, 4).unwrap();
        Seeder::new(store, clock())
            .with_seed(7)
            .with_password_hash(hash)
    }

    #[tokio::test]
    async fn seeds_expected_volumes() {
        let store = Arc::new(InMemoryStorage::new());
        let report = seeder(store.clone()).run(false).await.unwrap();

        assert_eq!(report.hosts, HOST_COUNT);
        assert_eq!(report.guests, GUEST_COUNT);
        assert_eq!(report.listings, LISTING_COUNT);
        assert_eq!(report.bookings, BOOKING_COUNT);
        assert!(report.host_responses <= report.reviews);

        let page = PaginationParams::new(1, 100);
        let bookings = store
            .bookings()
            .find_page(BookingFilter::default(), page)
            .await
            .unwrap();
        let completed = bookings
            .items
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .count();
        assert_eq!(report.reviews, completed * 7 / 10);

        for b in &bookings.items {
            assert_eq!(b.total_price, b.price_per_night * Decimal::from(b.num_nights()));
        }

        let reviews = store.reviews().find_page(ReviewFilter::default(), page).await.unwrap();
        assert!(reviews.items.iter().all(|r| r.is_verified));
    }

    #[tokio::test]
    async fn rerun_reuses_users_and_clear_drops_listings() {
        let store = Arc::new(InMemoryStorage::new());
        seeder(store.clone()).run(false).await.unwrap();
        let report = seeder(store.clone()).run(true).await.unwrap();

        assert_eq!(report.cleared_listings, LISTING_COUNT as u64);
        let listings = store
            .listings()
            .find_page(ListingFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(listings.total, LISTING_COUNT as u64);

        let users = store
            .users()
            .list_users(Default::default(), PaginationParams::new(1, 100))
            .await
            .unwrap();
        assert_eq!(users.total, (HOST_COUNT + GUEST_COUNT) as u64);
    }
}
