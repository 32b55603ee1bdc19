//! Product repository.

use std::sync::Arc;

use crate::entities::{Product, product};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use storefront_common::{AppError, AppResult};

/// Product repository for database operations.
#[derive(Clone)]
pub struct ProductRepository {
    db: Arc<DatabaseConnection>,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a product by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<product::Model>> {
        Product::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a product by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<product::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))
    }

    /// Create a new product.
    pub async fn create(&self, model: product::ActiveModel) -> AppResult<product::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a product.
    pub async fn update(&self, model: product::ActiveModel) -> AppResult<product::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_product(id: &str) -> product::Model {
        product::Model {
            id: id.to_string(),
            name: "Widget".to_string(),
            description: Some("A fine widget".to_string()),
            price: 19.99,
            reviews: serde_json::json!([]),
            num_of_reviews: 0,
            ratings: 0.0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let product = create_test_product("prod1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[product.clone()]])
                .into_connection(),
        );

        let repo = ProductRepository::new(db);
        let result = repo.find_by_id("prod1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Widget");
    }

    #[tokio::test]
    async fn test_create_product() {
        let product = create_test_product("prod1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[product.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ProductRepository::new(db);

        let active = product::ActiveModel {
            id: Set("prod1".to_string()),
            name: Set("Widget".to_string()),
            reviews: Set(serde_json::json!([])),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.num_of_reviews, 0);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<product::Model>::new()])
                .into_connection(),
        );

        let repo = ProductRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(result.is_err());
        match result {
            Err(AppError::ProductNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected ProductNotFound error"),
        }
    }
}
