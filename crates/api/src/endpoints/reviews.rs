//! Product review endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use storefront_common::AppResult;
use storefront_core::SubmitReviewInput;
use storefront_db::entities::product::Review;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Empty},
};

/// Review submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub product_id: String,
    pub rating: f64,
    pub comment: String,
    pub uniquecode: String,
}

/// Message payload for the submission response.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Review as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub rating: f64,
    pub comment: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
        }
    }
}

/// Reviews payload for the listing response.
#[derive(Debug, Serialize)]
pub struct ReviewsBody {
    pub reviews: Vec<ReviewResponse>,
}

/// List reviews request.
#[derive(Debug, Deserialize)]
pub struct ListReviewsQuery {
    /// Product ID.
    pub id: String,
}

/// Delete review request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewQuery {
    pub product_id: String,
    /// Review ID.
    pub id: String,
}

/// Submit (or replace) the authenticated user's review for a product.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitReviewRequest>,
) -> AppResult<ApiResponse<MessageBody>> {
    let outcome = state
        .review_service
        .submit(
            &user.id,
            SubmitReviewInput {
                product_id: req.product_id,
                rating: req.rating,
                comment: req.comment,
                unique_code: req.uniquecode,
            },
            Utc::now(),
        )
        .await?;

    Ok(ApiResponse::ok(MessageBody {
        message: outcome.message().to_string(),
    }))
}

/// List a product's reviews.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> AppResult<ApiResponse<ReviewsBody>> {
    let reviews = state.review_service.list(&query.id).await?;

    Ok(ApiResponse::ok(ReviewsBody {
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

/// Delete a review.
async fn remove(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DeleteReviewQuery>,
) -> AppResult<ApiResponse<Empty>> {
    state
        .review_service
        .delete(&query.product_id, &query.id)
        .await?;

    Ok(ApiResponse::ok(Empty {}))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/review", put(submit).delete(remove))
        .route("/reviews", get(list))
}
