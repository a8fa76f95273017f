use crate::domain::models::{CartItem, CategorySummary, Product};
use crate::domain::repository::{CartRepository, ProductRepository, UserRepository};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Non-destructive schema sync, run once at startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    info!("Syncing database schema");
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            phone TEXT
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            photo TEXT,
            price BIGINT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cart_items (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users (id),
            product_id UUID NOT NULL REFERENCES products (id),
            quantity INTEGER NOT NULL DEFAULT 1,
            added_at TIMESTAMPTZ NOT NULL,
            UNIQUE (user_id, product_id)
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users (id),
            order_date TIMESTAMPTZ NOT NULL DEFAULT now(),
            status TEXT NOT NULL DEFAULT 'pending'
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_items (
            id UUID PRIMARY KEY,
            order_id UUID NOT NULL REFERENCES orders (id),
            product_id UUID NOT NULL REFERENCES products (id),
            quantity INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    info!("Database schema synced");
    Ok(())
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, phone)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .execute(&self.pool)
        .await?;
        debug!(user_id = %user.id, "User row inserted");
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, phone FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, phone FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn save(&self, product: Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, name, quantity, description, category, photo, price)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.photo)
        .bind(product.price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, quantity, description, category, photo, price
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, quantity, description, category, photo, price FROM products",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>> {
        // LOWER comparison keeps the match exact; ILIKE would treat
        // % and _ in the requested category as wildcards
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, quantity, description, category, photo, price
             FROM products WHERE LOWER(category) = LOWER($1) ORDER BY name ASC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let categories = sqlx::query_as::<_, CategorySummary>(
            "SELECT category AS name, COUNT(id) AS count
             FROM products GROUP BY category ORDER BY category ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn insert_item(&self, item: CartItem) -> Result<()> {
        sqlx::query(
            "INSERT INTO cart_items (id, user_id, product_id, quantity, added_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item.id)
        .bind(item.user_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.added_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_item(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, product_id, quantity, added_at
             FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn list_items(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, product_id, quantity, added_at
             FROM cart_items WHERE user_id = $1 ORDER BY added_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn update_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<()> {
        sqlx::query("UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_item(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
