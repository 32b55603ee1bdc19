//! Product entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use storefront_common::{AppError, AppResult};

/// A customer review embedded in the product row.
///
/// The review sequence is stored as a JSON column; at most one entry exists
/// per reviewing user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub rating: f64,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub price: f64,

    /// Embedded review sequence (ordered, one entry per reviewing user)
    #[sea_orm(column_type = "JsonBinary")]
    pub reviews: Json,

    /// Review count (denormalized, always equals the sequence length)
    #[sea_orm(default_value = 0)]
    pub num_of_reviews: i32,

    /// Mean review rating (denormalized, 0 when the sequence is empty)
    pub ratings: f64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Decode the embedded review sequence.
    pub fn review_list(&self) -> AppResult<Vec<Review>> {
        serde_json::from_value(self.reviews.clone()).map_err(|e| {
            AppError::Internal(format!("Corrupt review data on product {}: {e}", self.id))
        })
    }
}

/// Encode a review sequence for storage.
pub fn encode_reviews(reviews: &[Review]) -> AppResult<Json> {
    serde_json::to_value(reviews)
        .map_err(|e| AppError::Internal(format!("Failed to encode reviews: {e}")))
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
