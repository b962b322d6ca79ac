pub mod address;
pub mod credit_card;
pub mod openapi;
pub mod user;

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        // 用户
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .patch(user::update_user)
                .delete(user::delete_user),
        )
        // 地址
        .route(
            "/addresses",
            get(address::list_addresses).post(address::create_address),
        )
        .route(
            "/addresses/{id}",
            get(address::get_address)
                .patch(address::update_address)
                .delete(address::delete_address),
        )
        // 信用卡
        .route(
            "/credit-cards",
            get(credit_card::list_credit_cards).post(credit_card::create_credit_card),
        )
        .route(
            "/credit-cards/{id}",
            get(credit_card::get_credit_card)
                .patch(credit_card::update_credit_card)
                .delete(credit_card::delete_credit_card),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::document(&state.config.api_base_uri))
}
