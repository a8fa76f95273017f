use crate::domain::user::{CreateUser, LoginRequest};
use crate::presentation::handlers::{ApiResponse, AppState, StoreError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

fn token_cookie(token: String) -> Cookie<'static> {
    Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, StoreError> {
    info!("Registration request received");

    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            StoreError::from(e)
        })?;

    let response = RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    };

    info!(user_id = %response.id, "User registered successfully");
    Ok(HttpResponse::Created().json(ApiResponse::new("User registered successfully", response)))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, StoreError> {
    info!("Login request received");

    let token = state.auth_service.login(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to login");
        StoreError::from(e)
    })?;

    info!("Login successful");
    Ok(HttpResponse::Ok()
        .cookie(token_cookie(token.clone()))
        .json(ApiResponse::new(
            "Login successful",
            LoginResponse {
                access_token: token,
            },
        )))
}

#[instrument]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new("token", "");
    cookie.set_path("/");
    cookie.make_removal();

    info!("Logout, token cookie cleared");
    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::new("Logged out successfully", ()))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, StoreError> {
    let user = state.auth_service.get_profile(user.id).await.map_err(|e| {
        error!(error = %e, "Failed to load profile");
        StoreError::from(e)
    })?;

    let response = ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        phone: user.phone,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile retrieved successfully", response)))
}
