use crate::domain::error::DomainError;
use crate::domain::models::{CategorySummary, Product};
use crate::domain::repository::ProductRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.products.list_all().await
    }

    /// Case-insensitive exact category match; an empty result is not-found.
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let products = self.products.list_by_category(category).await?;
        if products.is_empty() {
            warn!(category = category, "No products in category");
            return Err(DomainError::CategoryNotFound(category.to_string()).into());
        }
        info!(category = category, count = products.len(), "Category products retrieved");
        Ok(products)
    }

    pub async fn categories(&self) -> Result<Vec<CategorySummary>> {
        self.products.list_categories().await
    }

    pub async fn product_by_id(&self, id: Uuid) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()).into())
    }
}
