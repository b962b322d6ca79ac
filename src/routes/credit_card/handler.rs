use axum::{
    extract::{Json, Path, State, rejection::PathRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, ErrorResponse},
    models::CreditCard,
    utils::{JsonBody, path_id},
};

use super::model::{CreateCreditCardRequest, UpdateCreditCardRequest};

const CREDIT_CARD: &str = "Credit card";

#[utoipa::path(
    post,
    path = "/credit-cards",
    tag = "credit-cards",
    request_body = CreateCreditCardRequest,
    responses(
        (status = 201, description = "Credit card created, number masked", body = CreditCard),
        (status = 400, description = "Field errors, including an unknown user_id"),
    )
)]
#[axum::debug_handler]
pub async fn create_credit_card(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateCreditCardRequest>,
) -> Result<(StatusCode, Json<CreditCard>), AppError> {
    let new_card = req.validate()?;

    let card = state.credit_cards.create(new_card).await?;
    tracing::info!(
        credit_card_id = card.id,
        user_id = card.user_id,
        "Created credit card"
    );

    Ok((StatusCode::CREATED, Json(card)))
}

#[utoipa::path(
    get,
    path = "/credit-cards",
    tag = "credit-cards",
    responses((status = 200, description = "All credit cards, numbers masked", body = [CreditCard]))
)]
#[axum::debug_handler]
pub async fn list_credit_cards(
    State(state): State<AppState>,
) -> Result<Json<Vec<CreditCard>>, AppError> {
    Ok(Json(state.credit_cards.list().await?))
}

#[utoipa::path(
    get,
    path = "/credit-cards/{id}",
    tag = "credit-cards",
    params(("id" = i64, Path, description = "Credit card id")),
    responses(
        (status = 200, description = "Credit card, number masked", body = CreditCard),
        (status = 404, description = "Credit card not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn get_credit_card(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<CreditCard>, AppError> {
    let id = path_id(path, CREDIT_CARD)?;
    state
        .credit_cards
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(CREDIT_CARD))
}

#[utoipa::path(
    patch,
    path = "/credit-cards/{id}",
    tag = "credit-cards",
    params(("id" = i64, Path, description = "Credit card id")),
    request_body = UpdateCreditCardRequest,
    responses(
        (status = 200, description = "Updated credit card, number masked", body = CreditCard),
        (status = 400, description = "Field errors, including an unknown user_id"),
        (status = 404, description = "Credit card not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn update_credit_card(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<JsonBody<UpdateCreditCardRequest>, AppError>,
) -> Result<Json<CreditCard>, AppError> {
    let id = path_id(path, CREDIT_CARD)?;
    if state.credit_cards.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(CREDIT_CARD));
    }

    let JsonBody(req) = payload?;
    let changes = req.validate()?;

    let card = state
        .credit_cards
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound(CREDIT_CARD))?;
    tracing::info!(credit_card_id = id, "Updated credit card");

    Ok(Json(card))
}

#[utoipa::path(
    delete,
    path = "/credit-cards/{id}",
    tag = "credit-cards",
    params(("id" = i64, Path, description = "Credit card id")),
    responses(
        (status = 204, description = "Credit card deleted"),
        (status = 404, description = "Credit card not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn delete_credit_card(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path, CREDIT_CARD)?;
    if !state.credit_cards.delete(id).await? {
        return Err(AppError::NotFound(CREDIT_CARD));
    }
    tracing::info!(credit_card_id = id, "Deleted credit card");
    Ok(StatusCode::NO_CONTENT)
}
