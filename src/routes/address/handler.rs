use axum::{
    extract::{Json, Path, State, rejection::PathRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, ErrorResponse},
    models::Address,
    utils::{JsonBody, path_id},
};

use super::model::{CreateAddressRequest, UpdateAddressRequest};

const ADDRESS: &str = "Address";

#[utoipa::path(
    post,
    path = "/addresses",
    tag = "addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Field errors, including an unknown user_id"),
    )
)]
#[axum::debug_handler]
pub async fn create_address(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAddressRequest>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let new_address = req.validate()?;

    let address = state.addresses.create(new_address).await?;
    tracing::info!(
        address_id = address.id,
        user_id = address.user_id,
        "Created address"
    );

    Ok((StatusCode::CREATED, Json(address)))
}

#[utoipa::path(
    get,
    path = "/addresses",
    tag = "addresses",
    responses((status = 200, description = "All addresses", body = [Address]))
)]
#[axum::debug_handler]
pub async fn list_addresses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Address>>, AppError> {
    Ok(Json(state.addresses.list().await?))
}

#[utoipa::path(
    get,
    path = "/addresses/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address", body = Address),
        (status = 404, description = "Address not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn get_address(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Address>, AppError> {
    let id = path_id(path, ADDRESS)?;
    state
        .addresses
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(ADDRESS))
}

#[utoipa::path(
    patch,
    path = "/addresses/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Address id")),
    request_body = UpdateAddressRequest,
    responses(
        (status = 200, description = "Updated address", body = Address),
        (status = 400, description = "Field errors, including an unknown user_id"),
        (status = 404, description = "Address not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn update_address(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<JsonBody<UpdateAddressRequest>, AppError>,
) -> Result<Json<Address>, AppError> {
    let id = path_id(path, ADDRESS)?;
    if state.addresses.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(ADDRESS));
    }

    let JsonBody(req) = payload?;
    let changes = req.validate()?;

    let address = state
        .addresses
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound(ADDRESS))?;
    tracing::info!(address_id = id, "Updated address");

    Ok(Json(address))
}

#[utoipa::path(
    delete,
    path = "/addresses/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Address id")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 404, description = "Address not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn delete_address(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path, ADDRESS)?;
    if !state.addresses.delete(id).await? {
        return Err(AppError::NotFound(ADDRESS));
    }
    tracing::info!(address_id = id, "Deleted address");
    Ok(StatusCode::NO_CONTENT)
}
