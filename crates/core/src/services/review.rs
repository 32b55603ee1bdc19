//! Review submission, listing, and deletion.
//!
//! Submission is gated by the abuse guard: every attempt must pass the
//! suspension check, then prove the purchase with the order's unique code
//! before the review is written and the product aggregates recomputed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Deserialize;
use storefront_common::{AppError, AppResult, IdGenerator};
use storefront_db::{
    entities::{
        product::{self, Review},
        user,
    },
    repositories::{OrderRepository, ProductRepository, UserRepository},
};
use validator::Validate;

use crate::services::email;
use crate::services::guard::{GateDecision, GuardService, OutcomeDecision};
use crate::services::notifier::NotifierService;
use crate::services::rating;

/// Refusal shown while a suspension is in its lockout window.
const MSG_SUSPENDED: &str =
    "You are temporarily suspended from posting reviews. Please try again later.";
/// Refusal shown when the third failed attempt triggers a suspension.
const MSG_SUSPENDED_NOW: &str =
    "You have been suspended after 3 incorrect attempts. Try again in 1 hour.";
/// Refusal shown for a failed attempt below the threshold.
const MSG_INVALID_CODE: &str = "Invalid unique code. Please try again.";

/// Input for submitting a review.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewInput {
    pub product_id: String,

    /// Expected range 1-5; not range-checked here.
    pub rating: f64,

    #[validate(length(max = 2000))]
    pub comment: String,

    /// Purchase-proof token from the buyer's order.
    pub unique_code: String,
}

/// Result of a successful review submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new review was appended.
    Added,
    /// The user's existing review was updated in place.
    Updated,
}

impl SubmitOutcome {
    /// User-facing success message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Review added successfully",
            Self::Updated => "Review updated successfully",
        }
    }
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    user_repo: UserRepository,
    product_repo: ProductRepository,
    order_repo: OrderRepository,
    guard: GuardService,
    notifier: NotifierService,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        product_repo: ProductRepository,
        order_repo: OrderRepository,
        notifier: NotifierService,
    ) -> Self {
        Self {
            guard: GuardService::new(user_repo.clone()),
            user_repo,
            product_repo,
            order_repo,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a review for a purchased product.
    ///
    /// The guard state is persisted before every return, so a response always
    /// reflects durable state. The user row and the product row are written
    /// independently; a crash between the two leaves a recoverable gap that
    /// the next attempt re-validates.
    pub async fn submit(
        &self,
        user_id: &str,
        input: SubmitReviewInput,
        now: DateTime<Utc>,
    ) -> AppResult<SubmitOutcome> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let (gate, user) = self.guard.check_and_maybe_reset(user, now).await?;
        if gate == GateDecision::Blocked {
            return Err(AppError::Forbidden(MSG_SUSPENDED.to_string()));
        }

        // Purchase proof: an order by this user carrying the exact unique
        // code, with the product among its line items.
        let order = self
            .order_repo
            .find_by_user_and_code(user_id, &input.unique_code)
            .await?;
        let proven = match &order {
            Some(order) => order.contains_product(&input.product_id)?,
            None => false,
        };

        if !proven {
            let (outcome, user) = self.guard.record_outcome(user, false, now).await?;
            return match outcome {
                OutcomeDecision::SuspendedNow { .. } => {
                    self.dispatch_suspension_notice(&user);
                    Err(AppError::Forbidden(MSG_SUSPENDED_NOW.to_string()))
                }
                _ => Err(AppError::Forbidden(MSG_INVALID_CODE.to_string())),
            };
        }

        self.guard.record_outcome(user, true, now).await?;

        let product = self.product_repo.get_by_id(&input.product_id).await?;
        let mut reviews = product.review_list()?;
        let was_update = upsert_review(&mut reviews, user_id, input.rating, &input.comment, || {
            self.id_gen.generate()
        });
        self.persist_reviews(product, &reviews).await?;

        Ok(if was_update {
            SubmitOutcome::Updated
        } else {
            SubmitOutcome::Added
        })
    }

    /// List a product's reviews.
    pub async fn list(&self, product_id: &str) -> AppResult<Vec<Review>> {
        let product = self.product_repo.get_by_id(product_id).await?;
        product.review_list()
    }

    /// Delete a review by ID and recompute the product aggregates.
    pub async fn delete(&self, product_id: &str, review_id: &str) -> AppResult<()> {
        let product = self.product_repo.get_by_id(product_id).await?;
        let mut reviews = product.review_list()?;

        let before = reviews.len();
        reviews.retain(|review| review.id != review_id);
        if reviews.len() == before {
            return Err(AppError::NotFound(format!("Review not found: {review_id}")));
        }

        self.persist_reviews(product, &reviews).await?;
        Ok(())
    }

    /// Write the review sequence back with freshly computed aggregates.
    async fn persist_reviews(
        &self,
        product: product::Model,
        reviews: &[Review],
    ) -> AppResult<product::Model> {
        let summary = rating::aggregate(reviews);

        let mut active: product::ActiveModel = product.into();
        active.reviews = Set(product::encode_reviews(reviews)?);
        active.num_of_reviews = Set(summary.count as i32);
        active.ratings = Set(summary.mean);
        active.updated_at = Set(Some(Utc::now().into()));

        self.product_repo.update(active).await
    }

    /// Fire-and-forget suspension notice; failures are logged, never
    /// surfaced to the caller.
    fn dispatch_suspension_notice(&self, user: &user::Model) {
        let notifier = Arc::clone(&self.notifier);
        let (subject, text, html) = email::suspension_notice(&user.name);
        let to = user.email.clone();

        tokio::spawn(async move {
            if let Err(e) = notifier.send(&to, &subject, &text, Some(&html)).await {
                tracing::warn!(error = %e, to = %to, "Failed to send suspension notice");
            }
        });
    }
}

/// Insert or update the acting user's review in place.
///
/// Returns true when an existing entry was updated rather than appended.
fn upsert_review(
    reviews: &mut Vec<Review>,
    user_id: &str,
    rating: f64,
    comment: &str,
    new_id: impl FnOnce() -> String,
) -> bool {
    if let Some(existing) = reviews.iter_mut().find(|r| r.user_id == user_id) {
        existing.rating = rating;
        existing.comment = comment.to_string();
        true
    } else {
        reviews.push(Review {
            id: new_id(),
            user_id: user_id.to_string(),
            rating,
            comment: comment.to_string(),
        });
        false
    }
}
