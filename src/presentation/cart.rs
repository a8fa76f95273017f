use crate::application::cart_service::{AddOutcome, UpdateOutcome};
use crate::domain::models::{AddToCartRequest, MergeCartRequest, UpdateCartRequest};
use crate::presentation::handlers::{ApiResponse, AppState, StoreError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemovedItem {
    product_id: Uuid,
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, StoreError> {
    let entries = state.cart_service.get_cart(user.id).await.map_err(|e| {
        error!(error = %e, "Failed to retrieve cart");
        StoreError::from(e)
    })?;
    info!(items = entries.len(), "Cart retrieved successfully");
    Ok(HttpResponse::Ok().json(ApiResponse::new("Cart retrieved successfully", entries)))
}

#[instrument(skip(state, req), fields(user_id = %user.id, product_id = %req.product_id))]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, StoreError> {
    let req = req.into_inner();
    let outcome = state
        .cart_service
        .add_to_cart(user.id, req.product_id, req.quantity)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to add product to cart");
            StoreError::from(e)
        })?;

    let response = match outcome {
        AddOutcome::Added(mutation) => {
            info!(quantity = mutation.quantity, "Product added to cart");
            HttpResponse::Created().json(ApiResponse::new("Product added to cart", mutation))
        }
        AddOutcome::Merged(mutation) => {
            info!(quantity = mutation.quantity, "Product quantity updated in cart");
            HttpResponse::Ok().json(ApiResponse::new("Product quantity updated in cart", mutation))
        }
    };
    Ok(response)
}

#[instrument(skip(state, req), fields(user_id = %user.id, product_id = %req.product_id))]
pub async fn update_cart_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateCartRequest>,
) -> Result<HttpResponse, StoreError> {
    let req = req.into_inner();
    let outcome = state
        .cart_service
        .update_item(user.id, req.product_id, req.quantity)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update cart item");
            StoreError::from(e)
        })?;

    let response = match outcome {
        UpdateOutcome::Updated(mutation) => {
            info!(quantity = mutation.quantity, "Cart item updated");
            HttpResponse::Ok().json(ApiResponse::new("Cart item updated successfully", mutation))
        }
        UpdateOutcome::Removed(product_id) => {
            info!("Cart item removed via zero-quantity update");
            HttpResponse::Ok().json(ApiResponse::new(
                "Product removed from cart",
                RemovedItem { product_id },
            ))
        }
    };
    Ok(response)
}

#[instrument(skip(state), fields(user_id = %user.id, product_id = %path))]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, StoreError> {
    let product_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| StoreError::NotFound("Product not found in cart".to_string()))?;

    state
        .cart_service
        .remove_item(user.id, product_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to remove product from cart");
            StoreError::from(e)
        })?;

    info!("Product removed from cart");
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Product removed from cart",
        RemovedItem { product_id },
    )))
}

#[instrument(skip(state, req), fields(user_id = %user.id, lines = req.items.len()))]
pub async fn merge_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<MergeCartRequest>,
) -> Result<HttpResponse, StoreError> {
    let entries = state
        .cart_service
        .merge_cart(user.id, req.into_inner().items)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to merge cart");
            StoreError::from(e)
        })?;

    info!(items = entries.len(), "Cart merged successfully");
    Ok(HttpResponse::Ok().json(ApiResponse::new("Cart merged successfully", entries)))
}
