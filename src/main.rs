use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use dotenv::dotenv;
use hardware_store_api::application::auth_service::AuthService;
use hardware_store_api::application::cart_service::CartService;
use hardware_store_api::application::catalog_service::CatalogService;
use hardware_store_api::data::postgres::{
    PgCartRepository, PgProductRepository, PgUserRepository, init_schema,
};
use hardware_store_api::infrastructure::config::AppConfig;
use hardware_store_api::infrastructure::logging::init_logging;
use hardware_store_api::presentation::auth::{login, logout, profile, register};
use hardware_store_api::presentation::cart::{
    add_to_cart, get_cart, merge_cart, remove_from_cart, update_cart_item,
};
use hardware_store_api::presentation::handlers::{
    AppState, get_categories, get_product_by_id, get_products_by_category, health_check, home,
    welcome,
};
use hardware_store_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();
    info!("Logging initialized");

    let config = AppConfig::from_env()?;

    info!("Connecting to database");
    let pool = PgPool::connect(&config.database_url).await?;
    init_schema(&pool).await?;

    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let product_repository = Arc::new(PgProductRepository::new(pool.clone()));
    let cart_repository = Arc::new(PgCartRepository::new(pool));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        config.jwt_secret.clone(),
    ));
    let catalog_service = Arc::new(CatalogService::new(product_repository.clone()));
    let cart_service = Arc::new(CartService::new(product_repository, cart_repository));

    let state = web::Data::new(AppState {
        auth_service,
        catalog_service,
        cart_service,
    });

    let jwt_secret = config.jwt_secret.clone();
    let client_url = config.client_url.clone();

    info!(port = config.port, client_url = %client_url, "Configuring HTTP server");
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .route("/", web::get().to(welcome))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login))
                            .route("/logout", web::post().to(logout))
                            .service(
                                web::resource("/profile")
                                    .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                                    .route(web::get().to(profile)),
                            ),
                    )
                    .service(
                        web::scope("/cart")
                            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                            .route("", web::get().to(get_cart))
                            .route("/add", web::post().to(add_to_cart))
                            .route("/update", web::put().to(update_cart_item))
                            .route("/remove/{product_id}", web::delete().to(remove_from_cart))
                            .route("/merge", web::post().to(merge_cart)),
                    )
                    .route("/categories", web::get().to(get_categories))
                    .route(
                        "/category/{category}",
                        web::get().to(get_products_by_category),
                    )
                    .route("/product/{id}", web::get().to(get_product_by_id))
                    .route("", web::get().to(home)),
            )
    });

    let bind_addr = ("0.0.0.0", config.port);
    info!(address = %format!("{}:{}", bind_addr.0, bind_addr.1), "Starting HTTP server");
    let server = server.bind(bind_addr)?;
    server.run().await?;
    Ok(())
}
