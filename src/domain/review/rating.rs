//! Listing rating aggregate

/// Mean rating and count over a listing's reviews.
///
/// Always computed from the full set of ratings; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// 0.0 when there are no reviews
    pub average_rating: f64,
    pub review_count: u64,
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0u64), |(sum, count), r| (sum + r as i64, count + 1));

        let average_rating = if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        };

        Self {
            average_rating,
            review_count: count,
        }
    }
}
