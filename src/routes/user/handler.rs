use axum::{
    extract::{Json, Path, State, rejection::PathRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, ErrorResponse},
    models::UserWithRelations,
    utils::{JsonBody, path_id},
};

use super::model::{CreateUserRequest, UpdateUserRequest};

const USER: &str = "User";

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserWithRelations),
        (status = 400, description = "Field errors, or email/CPF already registered"),
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserWithRelations>), AppError> {
    let new_user = req.validate()?;

    // 应用层快速检查；并发下由数据库唯一索引兜底
    if state.users.email_taken(&new_user.email, None).await? {
        return Err(AppError::DuplicateEmail);
    }
    if state.users.cpf_taken(&new_user.cpf, None).await? {
        return Err(AppError::DuplicateCpf);
    }

    let user = state.users.create(new_user).await?;
    tracing::info!(user_id = user.id, "Created user");

    Ok((
        StatusCode::CREATED,
        Json(UserWithRelations::without_relations(user)),
    ))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users with their addresses and credit cards", body = [UserWithRelations]),
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithRelations>>, AppError> {
    let users = state.users.list_with_relations().await?;
    tracing::debug!("Listed {} users", users.len());
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User with addresses and credit cards", body = UserWithRelations),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<UserWithRelations>, AppError> {
    let id = path_id(path, USER)?;
    state
        .users
        .find_with_relations(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(USER))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user with addresses and credit cards", body = UserWithRelations),
        (status = 400, description = "Field errors, or email/CPF already registered"),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<JsonBody<UpdateUserRequest>, AppError>,
) -> Result<Json<UserWithRelations>, AppError> {
    let id = path_id(path, USER)?;
    if state.users.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(USER));
    }

    let JsonBody(req) = payload?;
    let changes = req.validate()?;

    // 只检查 email；cpf 冲突由唯一索引报告
    if let Some(email) = &changes.email {
        if state.users.email_taken(email, Some(id)).await? {
            return Err(AppError::DuplicateEmail);
        }
    }

    if state.users.update(id, changes).await?.is_none() {
        return Err(AppError::NotFound(USER));
    }
    tracing::info!(user_id = id, "Updated user");

    state
        .users
        .find_with_relations(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(USER))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User and its addresses and credit cards deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path, USER)?;
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound(USER));
    }
    tracing::info!(user_id = id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
