use crate::application::auth_service::AuthService;
use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::domain::error::DomainError;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub cart_service: Arc<CartService>,
}

/// Uniform success envelope: `success`, `message`, `data`, optional `count`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: None,
        }
    }

    pub fn with_count(message: impl Into<String>, data: T, count: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: Some(count),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "availableStock")]
    available_stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "currentQuantity")]
    current_quantity: Option<i32>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No products found in category: {0}")]
    CategoryNotFound(String),
    #[error("Not enough stock available")]
    OutOfStock { available: i32 },
    #[error("Adding this quantity would exceed available stock")]
    CartLimit { available: i32, current: i32 },
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            StoreError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            StoreError::CategoryNotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            StoreError::OutOfStock { .. } => actix_web::http::StatusCode::BAD_REQUEST,
            StoreError::CartLimit { .. } => actix_web::http::StatusCode::BAD_REQUEST,
            StoreError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            StoreError::Database(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // The storefront renders the empty category list, so this 404
        // carries an empty data array alongside the envelope.
        if let StoreError::CategoryNotFound(category) = self {
            warn!(category = %category, status = %status, "No products in category");
            return HttpResponse::build(status).json(serde_json::json!({
                "success": false,
                "message": format!("No products found in category: {category}"),
                "data": [],
                "count": 0,
            }));
        }

        let mut body = ErrorBody {
            success: false,
            message: self.to_string(),
            error: None,
            available_stock: None,
            current_quantity: None,
        };

        match self {
            StoreError::Validation(msg) => {
                body.message = msg.clone();
                warn!(error = %msg, status = %status, "Validation error");
            }
            StoreError::NotFound(msg) => {
                body.message = msg.clone();
                warn!(error = %msg, status = %status, "Resource not found");
            }
            // Handled by the early return above
            StoreError::CategoryNotFound(category) => {
                body.message = format!("No products found in category: {category}");
            }
            StoreError::OutOfStock { available } => {
                body.message = "Not enough stock available".to_string();
                body.available_stock = Some(*available);
                warn!(available = available, status = %status, "Not enough stock");
            }
            StoreError::CartLimit { available, current } => {
                body.message = "Adding this quantity would exceed available stock".to_string();
                body.available_stock = Some(*available);
                body.current_quantity = Some(*current);
                warn!(available = available, current = current, status = %status, "Cart limit hit");
            }
            StoreError::Unauthorized(msg) => {
                body.message = msg.clone();
                warn!(error = %msg, status = %status, "Unauthorized");
            }
            // The underlying message is echoed on 500, as the storefront
            // frontend expects an `error` field.
            StoreError::Database(msg) => {
                body.message = "Internal server error".to_string();
                body.error = Some(msg.clone());
                error!(error = %msg, status = %status, "Database error");
            }
            StoreError::Internal(msg) => {
                body.message = "Internal server error".to_string();
                body.error = Some(msg.clone());
                error!(error = %msg, status = %status, "Internal error");
            }
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::OutOfStock { available }) => StoreError::OutOfStock {
                available: *available,
            },
            Some(DomainError::CartLimit { available, current }) => StoreError::CartLimit {
                available: *available,
                current: *current,
            },
            Some(DomainError::Validation(msg)) => StoreError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => StoreError::NotFound(msg.clone()),
            Some(DomainError::CategoryNotFound(category)) => {
                StoreError::CategoryNotFound(category.clone())
            }
            Some(DomainError::Unauthorized(msg)) => StoreError::Unauthorized(msg.clone()),
            Some(DomainError::Internal(msg)) => StoreError::Internal(msg.clone()),
            None => StoreError::Database(err.to_string()),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = StoreError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| StoreError::Unauthorized("User not authenticated".to_string()))
        })
    }
}

// Handlers

#[instrument]
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to Hardware Store API")
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state))]
pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, StoreError> {
    info!("Listing all products");
    let products = state.catalog_service.list_products().await.map_err(|e| {
        error!(error = %e, "Failed to list products");
        StoreError::from(e)
    })?;
    let count = products.len();
    info!(count = count, "Products retrieved successfully");
    Ok(HttpResponse::Ok().json(ApiResponse::with_count(
        "Products retrieved successfully",
        products,
        count,
    )))
}

#[instrument(skip(state))]
pub async fn get_categories(state: web::Data<AppState>) -> Result<HttpResponse, StoreError> {
    let categories = state.catalog_service.categories().await.map_err(|e| {
        error!(error = %e, "Failed to list categories");
        StoreError::from(e)
    })?;
    let count = categories.len();
    info!(count = count, "Categories retrieved successfully");
    Ok(HttpResponse::Ok().json(ApiResponse::with_count(
        "Categories retrieved successfully",
        categories,
        count,
    )))
}

#[instrument(skip(state), fields(category = %path))]
pub async fn get_products_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    let category = path.into_inner();
    let products = state
        .catalog_service
        .products_by_category(&category)
        .await
        .map_err(StoreError::from)?;
    let count = products.len();
    info!(category = %category, count = count, "Category products retrieved");
    Ok(HttpResponse::Ok().json(ApiResponse::with_count(
        format!("Products in {category} category retrieved successfully"),
        products,
        count,
    )))
}

#[instrument(skip(state), fields(product_id = %path))]
pub async fn get_product_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    // A non-UUID id cannot name a product
    let id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| StoreError::NotFound("Product not found".to_string()))?;
    let product = state
        .catalog_service
        .product_by_id(id)
        .await
        .map_err(StoreError::from)?;
    info!(product_id = %product.id, "Product retrieved successfully");
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Product retrieved successfully",
        product,
    )))
}
