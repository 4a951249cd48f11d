//! Error types for the product service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorResponse, FieldError};

// == Store Error ==
/// Failure reported by a product store backend.
///
/// Propagated unchanged through the caching layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Backend could not be reached or failed the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Api Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested product does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request body failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request body was not a readable JSON product
    #[error(transparent)]
    Body(#[from] JsonRejection),

    /// Path parameter could not be parsed
    #[error(transparent)]
    Path(#[from] PathRejection),

    /// Product store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
/// Renders the error as an [`ErrorResponse`].
///
/// The body is also stored in the response extensions so that
/// [`attach_request_path`] can add the request path on the way out.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, Vec::new()),
            ApiError::Validation(details) => {
                (StatusCode::BAD_REQUEST, "Validation failed".to_string(), details)
            }
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text(), Vec::new()),
            ApiError::Path(rejection) => (rejection.status(), rejection.body_text(), Vec::new()),
            ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), Vec::new()),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        let body = ErrorResponse::new(status, message, details);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

// == Request Path ==
/// Middleware filling in `path` on every [`ErrorResponse`] produced below it.
///
/// Must wrap the whole router so that the path is seen before nesting strips
/// its prefix.
pub async fn attach_request_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    let Some(body) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };

    let (parts, _) = response.into_parts();
    let body = Json(body.with_path(path)).into_response().into_body();
    Response::from_parts(parts, body)
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, ApiError>;
