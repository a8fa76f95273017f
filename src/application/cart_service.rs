use crate::domain::error::DomainError;
use crate::domain::models::{CartEntry, CartItem, CartMutation, LocalCartLine};
use crate::domain::repository::{CartRepository, ProductRepository};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Whether an add created a new cart row or merged into an existing one.
#[derive(Debug)]
pub enum AddOutcome {
    Added(CartMutation),
    Merged(CartMutation),
}

/// An update with quantity <= 0 behaves as removal.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(CartMutation),
    Removed(Uuid),
}

pub struct CartService {
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(products: Arc<dyn ProductRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { products, carts }
    }

    /// Cart rows joined with product details. Rows whose product has
    /// disappeared from the catalog are skipped.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: Uuid) -> Result<Vec<CartEntry>> {
        let items = self.carts.list_items(user_id).await?;
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let Some(product) = self.products.find_by_id(item.product_id).await? else {
                warn!(product_id = %item.product_id, "Cart references missing product");
                continue;
            };
            entries.push(CartEntry {
                id: product.id,
                name: product.name,
                price: product.price,
                image: product.photo,
                description: product.description,
                category: product.category,
                quantity: item.quantity,
                max_stock: product.quantity,
            });
        }
        Ok(entries)
    }

    /// Stock ceiling is enforced at write time; the read-check-then-write
    /// sequence is not transactional.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<AddOutcome> {
        if quantity <= 0 {
            return Err(
                DomainError::Validation("Quantity must be greater than 0".to_string()).into(),
            );
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()))?;

        if product.quantity < quantity {
            warn!(
                available = product.quantity,
                requested = quantity,
                "Add rejected, not enough stock"
            );
            return Err(DomainError::OutOfStock {
                available: product.quantity,
            }
            .into());
        }

        if let Some(existing) = self.carts.find_item(user_id, product_id).await? {
            let new_quantity = existing.quantity + quantity;
            if new_quantity > product.quantity {
                warn!(
                    available = product.quantity,
                    current = existing.quantity,
                    requested = quantity,
                    "Merge rejected, would exceed stock"
                );
                return Err(DomainError::CartLimit {
                    available: product.quantity,
                    current: existing.quantity,
                }
                .into());
            }
            self.carts
                .update_quantity(user_id, product_id, new_quantity)
                .await?;
            info!(quantity = new_quantity, "Cart row merged");
            return Ok(AddOutcome::Merged(CartMutation {
                product_id,
                quantity: new_quantity,
            }));
        }

        self.carts
            .insert_item(CartItem {
                id: Uuid::new_v4(),
                user_id,
                product_id,
                quantity,
                added_at: Utc::now(),
            })
            .await?;
        info!(quantity = quantity, "Cart row added");
        Ok(AddOutcome::Added(CartMutation {
            product_id,
            quantity,
        }))
    }

    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn update_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<UpdateOutcome> {
        if quantity <= 0 {
            debug!("Non-positive quantity, removing cart row instead");
            self.remove_item(user_id, product_id).await?;
            return Ok(UpdateOutcome::Removed(product_id));
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()))?;

        if product.quantity < quantity {
            return Err(DomainError::OutOfStock {
                available: product.quantity,
            }
            .into());
        }

        if self.carts.find_item(user_id, product_id).await?.is_none() {
            return Err(DomainError::NotFound("Product not found in cart".to_string()).into());
        }

        self.carts
            .update_quantity(user_id, product_id, quantity)
            .await?;
        info!(quantity = quantity, "Cart row updated");
        Ok(UpdateOutcome::Updated(CartMutation {
            product_id,
            quantity,
        }))
    }

    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> Result<()> {
        let deleted = self.carts.delete_item(user_id, product_id).await?;
        if !deleted {
            return Err(DomainError::NotFound("Product not found in cart".to_string()).into());
        }
        info!("Cart row removed");
        Ok(())
    }

    /// Reconciles a cart accumulated before login against the persisted one:
    /// lines absent server-side are inserted, lines with a higher local
    /// quantity are raised, everything else is left untouched. Quantities are
    /// capped at stock and never lowered; unknown products are skipped.
    /// Returns the resulting cart view.
    #[instrument(skip(self, lines), fields(user_id = %user_id, lines = lines.len()))]
    pub async fn merge_cart(
        &self,
        user_id: Uuid,
        lines: Vec<LocalCartLine>,
    ) -> Result<Vec<CartEntry>> {
        for line in lines {
            if line.quantity <= 0 {
                continue;
            }
            let Some(product) = self.products.find_by_id(line.product_id).await? else {
                warn!(product_id = %line.product_id, "Skipping unknown product in merge");
                continue;
            };
            let capped = line.quantity.min(product.quantity);
            if capped <= 0 {
                continue;
            }

            match self.carts.find_item(user_id, line.product_id).await? {
                None => {
                    self.carts
                        .insert_item(CartItem {
                            id: Uuid::new_v4(),
                            user_id,
                            product_id: line.product_id,
                            quantity: capped,
                            added_at: Utc::now(),
                        })
                        .await?;
                    debug!(product_id = %line.product_id, quantity = capped, "Merge inserted row");
                }
                Some(existing) if capped > existing.quantity => {
                    self.carts
                        .update_quantity(user_id, line.product_id, capped)
                        .await?;
                    debug!(product_id = %line.product_id, quantity = capped, "Merge raised row");
                }
                Some(_) => {}
            }
        }

        info!("Cart merge reconciled");
        self.get_cart(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{InMemoryCartRepository, InMemoryProductRepository};
    use crate::domain::models::Product;

    struct Fixture {
        products: Arc<InMemoryProductRepository>,
        service: CartService,
        user_id: Uuid,
    }

    impl Fixture {
        async fn new() -> Self {
            let products = Arc::new(InMemoryProductRepository::new());
            let carts = Arc::new(InMemoryCartRepository::new());
            let service = CartService::new(products.clone(), carts);
            Self {
                products,
                service,
                user_id: Uuid::new_v4(),
            }
        }

        async fn add_product(&self, stock: i32) -> Uuid {
            let id = Uuid::new_v4();
            self.products
                .save(Product {
                    id,
                    name: format!("Product {id}"),
                    quantity: stock,
                    description: None,
                    category: "GPU".to_string(),
                    photo: None,
                    price: 159999,
                })
                .await
                .unwrap();
            id
        }
    }

    #[tokio::test]
    async fn test_add_beyond_stock_reports_available() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(3).await;

        let err = fx
            .service
            .add_to_cart(fx.user_id, product_id, 4)
            .await
            .unwrap_err();

        match err.downcast_ref::<DomainError>() {
            Some(DomainError::OutOfStock { available }) => assert_eq!(*available, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_twice_merges_instead_of_duplicating() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(10).await;

        fx.service
            .add_to_cart(fx.user_id, product_id, 2)
            .await
            .unwrap();
        let outcome = fx
            .service
            .add_to_cart(fx.user_id, product_id, 3)
            .await
            .unwrap();

        match outcome {
            AddOutcome::Merged(mutation) => assert_eq!(mutation.quantity, 5),
            AddOutcome::Added(_) => panic!("expected merge into existing row"),
        }
        let cart = fx.service.get_cart(fx.user_id).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_merging_past_stock_reports_current_quantity() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(5).await;
        fx.service
            .add_to_cart(fx.user_id, product_id, 4)
            .await
            .unwrap();

        let err = fx
            .service
            .add_to_cart(fx.user_id, product_id, 2)
            .await
            .unwrap_err();

        match err.downcast_ref::<DomainError>() {
            Some(DomainError::CartLimit { available, current }) => {
                assert_eq!(*available, 5);
                assert_eq!(*current, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_row() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(10).await;
        fx.service
            .add_to_cart(fx.user_id, product_id, 2)
            .await
            .unwrap();

        let outcome = fx
            .service
            .update_item(fx.user_id, product_id, 0)
            .await
            .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Removed(_)));
        assert!(fx.service.get_cart(fx.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_row_is_not_found() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(10).await;

        let err = fx
            .service
            .remove_item(fx.user_id, product_id)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_merge_inserts_missing_and_raises_lower() {
        let fx = Fixture::new().await;
        let in_cart = fx.add_product(10).await;
        let only_local = fx.add_product(10).await;
        fx.service.add_to_cart(fx.user_id, in_cart, 2).await.unwrap();

        let cart = fx
            .service
            .merge_cart(
                fx.user_id,
                vec![
                    LocalCartLine {
                        product_id: in_cart,
                        quantity: 5,
                    },
                    LocalCartLine {
                        product_id: only_local,
                        quantity: 1,
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(cart.len(), 2);
        let merged = cart.iter().find(|e| e.id == in_cart).unwrap();
        assert_eq!(merged.quantity, 5);
        let inserted = cart.iter().find(|e| e.id == only_local).unwrap();
        assert_eq!(inserted.quantity, 1);
    }

    #[tokio::test]
    async fn test_merge_never_lowers_server_quantity() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(10).await;
        fx.service
            .add_to_cart(fx.user_id, product_id, 6)
            .await
            .unwrap();

        let cart = fx
            .service
            .merge_cart(
                fx.user_id,
                vec![LocalCartLine {
                    product_id,
                    quantity: 2,
                }],
            )
            .await
            .unwrap();

        assert_eq!(cart[0].quantity, 6);
    }

    #[tokio::test]
    async fn test_merge_caps_at_stock_and_skips_unknown() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(4).await;

        let cart = fx
            .service
            .merge_cart(
                fx.user_id,
                vec![
                    LocalCartLine {
                        product_id,
                        quantity: 9,
                    },
                    LocalCartLine {
                        product_id: Uuid::new_v4(),
                        quantity: 3,
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let fx = Fixture::new().await;
        let product_id = fx.add_product(10).await;
        let lines = vec![LocalCartLine {
            product_id,
            quantity: 3,
        }];

        fx.service
            .merge_cart(fx.user_id, lines.clone())
            .await
            .unwrap();
        let cart = fx.service.merge_cart(fx.user_id, lines).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 3);
    }
}
