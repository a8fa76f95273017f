use actix_web::{App, test, web};
use hardware_store_api::application::auth_service::AuthService;
use hardware_store_api::application::cart_service::CartService;
use hardware_store_api::application::catalog_service::CatalogService;
use hardware_store_api::data::memory::{InMemoryCartRepository, InMemoryProductRepository};
use hardware_store_api::data::user_repository::InMemoryUserRepository;
use hardware_store_api::domain::models::Product;
use hardware_store_api::domain::repository::ProductRepository;
use hardware_store_api::domain::user::{CreateUser, LoginRequest};
use hardware_store_api::presentation::cart::{
    add_to_cart, get_cart, merge_cart, remove_from_cart, update_cart_item,
};
use hardware_store_api::presentation::handlers::AppState;
use hardware_store_api::presentation::middleware::JwtAuthMiddleware;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

macro_rules! setup_cart_test {
    () => {{
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let product_repository = Arc::new(InMemoryProductRepository::new());
        let cart_repository = Arc::new(InMemoryCartRepository::new());

        let jwt_secret = "test-secret-key-for-cart-tests".to_string();
        let auth_service = Arc::new(AuthService::new(user_repository, jwt_secret.clone()));
        let catalog_service = Arc::new(CatalogService::new(product_repository.clone()));
        let cart_service = Arc::new(CartService::new(
            product_repository.clone(),
            cart_repository,
        ));

        auth_service
            .register_user(CreateUser {
                username: "tester".to_string(),
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        let token = auth_service
            .login(LoginRequest {
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let state = web::Data::new(AppState {
            auth_service,
            catalog_service,
            cart_service,
        });

        let app = test::init_service(
            App::new().app_data(state.clone()).service(
                web::scope("/api/cart")
                    .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
                    .route("", web::get().to(get_cart))
                    .route("/add", web::post().to(add_to_cart))
                    .route("/update", web::put().to(update_cart_item))
                    .route("/remove/{product_id}", web::delete().to(remove_from_cart))
                    .route("/merge", web::post().to(merge_cart)),
            ),
        )
        .await;

        (app, token, product_repository)
    }};
}

async fn seed_product(repo: &InMemoryProductRepository, name: &str, stock: i32) -> Uuid {
    let id = Uuid::new_v4();
    repo.save(Product {
        id,
        name: name.to_string(),
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

#[actix_web::test]
async fn test_cart_requires_authentication() {
    let (app, _token, _products) = setup_cart_test!();

    let req = test::TestRequest::get().uri("/api/cart").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_add_then_get_cart_shows_product_details() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 15).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/cart")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "RTX 4090");
    assert_eq!(data[0]["quantity"], 2);
    assert_eq!(data[0]["maxStock"], 15);
    assert_eq!(data[0]["price"], 159999);
}

#[actix_web::test]
async fn test_add_defaults_to_quantity_one() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 15).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["quantity"], 1);
}

#[actix_web::test]
async fn test_add_beyond_stock_reports_available_stock() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 3).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 4 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["availableStock"], 3);
}

#[actix_web::test]
async fn test_add_unknown_product_is_not_found() {
    let (app, token, _products) = setup_cart_test!();

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": Uuid::new_v4(), "quantity": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_add_twice_merges_into_single_row() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 10).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["quantity"], 5);

    let req = test::TestRequest::get()
        .uri("/api/cart")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_merging_past_stock_reports_current_quantity() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 5).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 4 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["availableStock"], 5);
    assert_eq!(body["currentQuantity"], 4);
}

#[actix_web::test]
async fn test_update_to_zero_behaves_as_removal() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 10).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri("/api/cart/update")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Product removed from cart");

    let req = test::TestRequest::get()
        .uri("/api/cart")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_update_beyond_stock_is_rejected() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 5).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri("/api/cart/update")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 8 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["availableStock"], 5);
}

#[actix_web::test]
async fn test_update_product_not_in_cart_is_not_found() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 5).await;

    let req = test::TestRequest::put()
        .uri("/api/cart/update")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_remove_missing_cart_entry_is_not_found() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 5).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/cart/remove/{product_id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_remove_deletes_cart_entry() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 5).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 1 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/cart/remove/{product_id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/cart")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_merge_reconciles_local_cart_snapshot() {
    let (app, token, products) = setup_cart_test!();
    let in_cart = seed_product(&products, "RTX 4090", 10).await;
    let only_local = seed_product(&products, "RTX 4080", 4).await;

    // Server cart starts with 2 of the first product
    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": in_cart, "quantity": 2 }))
        .to_request();
    test::call_service(&app, req).await;

    // Local snapshot: higher quantity for the first, over-stock for the second
    let req = test::TestRequest::post()
        .uri("/api/cart/merge")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "items": [
                { "productId": in_cart, "quantity": 5 },
                { "productId": only_local, "quantity": 9 },
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    let merged = data.iter().find(|e| e["id"] == json!(in_cart)).unwrap();
    assert_eq!(merged["quantity"], 5);
    let capped = data.iter().find(|e| e["id"] == json!(only_local)).unwrap();
    assert_eq!(capped["quantity"], 4);
}

#[actix_web::test]
async fn test_merge_with_lower_local_quantity_leaves_cart_unchanged() {
    let (app, token, products) = setup_cart_test!();
    let product_id = seed_product(&products, "RTX 4090", 10).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/add")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "productId": product_id, "quantity": 6 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/cart/merge")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "items": [{ "productId": product_id, "quantity": 2 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["quantity"], 6);
}
