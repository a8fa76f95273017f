use crate::domain::models::{CartItem, CategorySummary, Product};
use crate::domain::repository::{CartRepository, ProductRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryProductRepository {
    storage: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(product.id, product);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        let storage = self.storage.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let storage = self.storage.read().await;
        let mut products: Vec<Product> = storage
            .values()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let storage = self.storage.read().await;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for product in storage.values() {
            *counts.entry(product.category.clone()).or_insert(0) += 1;
        }
        let mut categories: Vec<CategorySummary> = counts
            .into_iter()
            .map(|(name, count)| CategorySummary { name, count })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[derive(Clone)]
pub struct InMemoryCartRepository {
    storage: Arc<RwLock<HashMap<(Uuid, Uuid), CartItem>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCartRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn insert_item(&self, item: CartItem) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert((item.user_id, item.product_id), item);
        Ok(())
    }

    async fn find_item(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&(user_id, product_id)).cloned())
    }

    async fn list_items(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let storage = self.storage.read().await;
        let mut items: Vec<CartItem> = storage
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.added_at);
        Ok(items)
    }

    async fn update_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<()> {
        let mut storage = self.storage.write().await;
        if let Some(item) = storage.get_mut(&(user_id, product_id)) {
            item.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_item(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(&(user_id, product_id)).is_some())
    }
}
