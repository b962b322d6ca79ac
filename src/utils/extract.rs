use axum::{
    Json,
    extract::{FromRequest, Path, Request, rejection::PathRejection},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{FieldErrors, NON_FIELD_ERRORS, json_type_name};
use crate::error::AppError;

/// JSON 请求体，必须是对象。
///
/// Syntax and content-type failures become `{"error": ..}`; a body that parses
/// but is not an object is reported under `non_field_errors`. Field-level type
/// problems are left to the request's `validate`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(JsonBody)
                .map_err(|e| AppError::BadRequest(e.to_string())),
            other => Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(&other)
                ),
            )
            .into()),
        }
    }
}

/// Resolves an `{id}` path segment; anything that is not an integer id
/// cannot name a row, so it is a 404 for `entity`.
pub fn path_id(
    path: Result<Path<i64>, PathRejection>,
    entity: &'static str,
) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Unusable {} id: {}", entity, rejection.body_text());
            Err(AppError::NotFound(entity))
        }
    }
}
