//! HTTP handlers shared by every collection.
//!
//! Each collection registers the same five handlers, instantiated for its
//! record type. Handlers enforce the existence and duplication rules that the
//! store itself does not.
use crate::store::{Record, Store, StoreError};
use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

pub mod docs;

/// JSON response for API errors
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description
    pub message: String,
}

/// Custom error type for resource handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Malformed path identifier or request body.
    #[error("{0}")]
    Validation(String),
    /// The requested identifier does not exist.
    #[error("{0} with ID {1} not found")]
    NotFound(&'static str, i64),
    /// Create was asked for an identifier that is already taken.
    #[error("{0} with ID {1} already exists")]
    Conflict(&'static str, i64),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Persistence(#[source] sea_orm::DbErr),
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(kind, id) => ResourceError::NotFound(kind, id),
            StoreError::AlreadyExists(kind, id) => ResourceError::Conflict(kind, id),
            StoreError::Database(err) => ResourceError::Persistence(err),
        }
    }
}

impl From<JsonRejection> for ResourceError {
    fn from(rejection: JsonRejection) -> Self {
        ResourceError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        let (status_code, error) = match &self {
            ResourceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ResourceError::NotFound(..) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ResourceError::Conflict(..) => (StatusCode::BAD_REQUEST, "ALREADY_EXISTS"),
            ResourceError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = match self {
            ResourceError::Persistence(err) => {
                tracing::error!("Request failed on a database error: {}", err);
                "An unexpected error occurred while processing your request. Please try again later."
                    .to_string()
            }
            other => other.to_string(),
        };

        (
            status_code,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

/// Identifier taken from the `{id}` path segment. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl ResourceId {
    /// Parses a decimal identifier, rejecting anything that is not a positive `i64`.
    ///
    /// Only plain ASCII digits are accepted, so signs and whitespace are refused.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let digits_only = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<i64>() {
            Ok(id) if digits_only && id > 0 => Ok(Self(id)),
            _ => Err(ResourceError::Validation(format!(
                "Invalid ID '{}': expected a positive integer",
                raw
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ResourceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ResourceError::Validation(rejection.body_text()))?;
        ResourceId::parse(&raw)
    }
}

/// Rejects a body whose title is empty or whitespace.
fn validate_input<R: Record>(input: &R::Input) -> Result<(), ResourceError> {
    if R::title(input).trim().is_empty() {
        return Err(ResourceError::Validation(format!(
            "Invalid {}: title must not be blank",
            R::KIND
        )));
    }
    Ok(())
}

/// Handler for POST /{collection} - Creates a record from the request body.
///
/// A body that names an identifier already in use is rejected before the
/// insert is attempted. A concurrent create that takes the identifier after
/// that check is still reported as a conflict by the store.
#[tracing::instrument(skip(store, payload), fields(kind = R::KIND))]
pub async fn create_handler<R: Record>(
    State(store): State<Store<R>>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ResourceError> {
    let Json(input) = payload?;
    validate_input::<R>(&input)?;

    if let Some(id) = R::requested_id(&input) {
        if id <= 0 {
            return Err(ResourceError::Validation(format!(
                "Invalid ID '{}': expected a positive integer",
                id
            )));
        }
        match store.get_by_id(id).await {
            Ok(_) => {
                tracing::warn!("Refusing to create {} with taken ID {}", R::KIND, id);
                return Err(ResourceError::Conflict(R::KIND, id));
            }
            Err(StoreError::NotFound(..)) => {}
            Err(err) => return Err(err.into()),
        }
    }

    let record = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /{collection} - Returns every record as a JSON array.
#[tracing::instrument(skip(store), fields(kind = R::KIND))]
pub async fn list_handler<R: Record>(
    State(store): State<Store<R>>,
) -> Result<Json<Vec<R>>, ResourceError> {
    let records = store.list().await?;
    Ok(Json(records))
}

/// Handler for GET /{collection}/{id} - Returns one record.
#[tracing::instrument(skip(store), fields(kind = R::KIND))]
pub async fn get_handler<R: Record>(
    State(store): State<Store<R>>,
    id: ResourceId,
) -> Result<Json<R>, ResourceError> {
    let record = store.get_by_id(id.0).await?;
    Ok(Json(record))
}

/// Handler for PUT /{collection}/{id} - Replaces an existing record.
///
/// The path identifier wins over any identifier in the body.
#[tracing::instrument(skip(store, payload), fields(kind = R::KIND))]
pub async fn update_handler<R: Record>(
    State(store): State<Store<R>>,
    id: ResourceId,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<StatusCode, ResourceError> {
    let Json(input) = payload?;
    validate_input::<R>(&input)?;

    // TODO: collapse the existence check and the write into one conditional
    // UPDATE so concurrent deletes cannot slip in between.
    store.get_by_id(id.0).await?;
    store.update(id.0, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /{collection}/{id} - Removes an existing record.
#[tracing::instrument(skip(store), fields(kind = R::KIND))]
pub async fn delete_handler<R: Record>(
    State(store): State<Store<R>>,
    id: ResourceId,
) -> Result<StatusCode, ResourceError> {
    store.get_by_id(id.0).await?;
    store.delete(id.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates a router serving `/{collection}` and `/{collection}/{id}` for `R`.
pub fn create_resource_router<R: Record>(store: Store<R>) -> Router {
    let collection_path = format!("/{}", R::COLLECTION);
    let item_path = format!("/{}/{{id}}", R::COLLECTION);

    Router::new()
        .route(
            &collection_path,
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            &item_path,
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(store)
}
