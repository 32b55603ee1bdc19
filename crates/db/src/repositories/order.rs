//! Order repository.

use std::sync::Arc;

use crate::entities::{Order, order};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use storefront_common::{AppError, AppResult};

/// Order repository for database operations.
#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<DatabaseConnection>,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's order by its unique code (exact string equality).
    ///
    /// Whether the order actually contains the product under review is
    /// checked by the caller against the embedded line items.
    pub async fn find_by_user_and_code(
        &self,
        user_id: &str,
        unique_code: &str,
    ) -> AppResult<Option<order::Model>> {
        Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::UniqueCode.eq(unique_code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new order.
    pub async fn create(&self, model: order::ActiveModel) -> AppResult<order::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::order::OrderItem;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_order(user_id: &str, unique_code: &str) -> order::Model {
        order::Model {
            id: "order1".to_string(),
            user_id: user_id.to_string(),
            order_items: serde_json::to_value([OrderItem {
                product_id: "prod1".to_string(),
                quantity: 1,
            }])
            .unwrap(),
            unique_code: unique_code.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_code_found() {
        let order = create_test_order("user1", "c0ffee");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[order.clone()]])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let result = repo.find_by_user_and_code("user1", "c0ffee").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().unique_code, "c0ffee");
    }

    #[tokio::test]
    async fn test_create_order() {
        let order = create_test_order("user1", "c0ffee");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[order.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);

        let active = order::ActiveModel {
            id: Set("order1".to_string()),
            user_id: Set("user1".to_string()),
            order_items: Set(serde_json::json!([])),
            unique_code: Set("c0ffee".to_string()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.unique_code, "c0ffee");
    }

    #[tokio::test]
    async fn test_find_by_user_and_code_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<order::Model>::new()])
                .into_connection(),
        );

        let repo = OrderRepository::new(db);
        let result = repo.find_by_user_and_code("user1", "wrong").await.unwrap();

        assert!(result.is_none());
    }
}
