//! Order entity.
//!
//! Orders are immutable records of a purchase; the `unique_code` assigned at
//! order creation is the buyer's proof of purchase when submitting a review.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use storefront_common::{AppError, AppResult};

/// A purchased line item embedded in the order row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    /// Embedded line items
    #[sea_orm(column_type = "JsonBinary")]
    pub order_items: Json,

    /// Purchase-proof token handed to the buyer at checkout
    #[sea_orm(unique)]
    pub unique_code: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Decode the embedded line items.
    pub fn items(&self) -> AppResult<Vec<OrderItem>> {
        serde_json::from_value(self.order_items.clone())
            .map_err(|e| AppError::Internal(format!("Corrupt order items on order {}: {e}", self.id)))
    }

    /// Whether this order contains the given product.
    pub fn contains_product(&self, product_id: &str) -> AppResult<bool> {
        Ok(self.items()?.iter().any(|item| item.product_id == product_id))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order_with_items(items: &[OrderItem]) -> Model {
        Model {
            id: "order1".to_string(),
            user_id: "user1".to_string(),
            order_items: serde_json::to_value(items).unwrap(),
            unique_code: "c0ffee".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_contains_product() {
        let order = order_with_items(&[
            OrderItem {
                product_id: "prod1".to_string(),
                quantity: 2,
            },
            OrderItem {
                product_id: "prod2".to_string(),
                quantity: 1,
            },
        ]);

        assert!(order.contains_product("prod1").unwrap());
        assert!(order.contains_product("prod2").unwrap());
        assert!(!order.contains_product("prod3").unwrap());
    }

    #[test]
    fn test_empty_order_contains_nothing() {
        let order = order_with_items(&[]);
        assert!(!order.contains_product("prod1").unwrap());
    }
}
