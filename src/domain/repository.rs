use crate::domain::models::{CartItem, CategorySummary, Product};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: Product) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;
    async fn list_all(&self) -> Result<Vec<Product>>;
    /// Case-insensitive exact category match, sorted by product name.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>>;
    /// Distinct categories with product counts, sorted by category name.
    async fn list_categories(&self) -> Result<Vec<CategorySummary>>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn insert_item(&self, item: CartItem) -> Result<()>;
    async fn find_item(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>>;
    async fn list_items(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
    async fn update_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<()>;
    /// Returns false when no row existed for (user_id, product_id).
    async fn delete_item(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;
}
