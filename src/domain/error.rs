use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not enough stock available")]
    OutOfStock { available: i32 },
    #[error("Adding this quantity would exceed available stock")]
    CartLimit { available: i32, current: i32 },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No products found in category: {0}")]
    CategoryNotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
