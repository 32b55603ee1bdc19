//! Product rating aggregation.

use storefront_db::entities::product::Review;

/// Aggregate summary of a product's review sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Number of reviews.
    pub count: usize,
    /// Arithmetic mean of the ratings, 0 when there are no reviews.
    pub mean: f64,
}

/// Compute the review count and mean rating for a review sequence.
///
/// The mean is exactly 0 for an empty sequence so that no NaN can reach
/// stored state.
#[must_use]
pub fn aggregate(reviews: &[Review]) -> RatingSummary {
    let count = reviews.len();
    if count == 0 {
        return RatingSummary { count: 0, mean: 0.0 };
    }

    let sum: f64 = reviews.iter().map(|r| r.rating).sum();
    RatingSummary {
        count,
        mean: sum / count as f64,
    }
}
