use crate::utils::error::CalcError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug)]
pub enum ApiError {
    Calc(CalcError),
    BadRequest(String),
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        ApiError::Calc(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            ApiError::Calc(err) => match err {
                CalcError::InvalidSize { .. } => (StatusCode::BAD_REQUEST, "invalid_size"),
                CalcError::InvalidOrderSize { .. } => {
                    (StatusCode::BAD_REQUEST, "invalid_order_size")
                }
                CalcError::NoPackagesAvailable => {
                    (StatusCode::BAD_REQUEST, "no_packages_available")
                }
                CalcError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                CalcError::SearchSpaceTooLarge { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "search_space_too_large")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Calc(err) => {
                if err.is_client_error() {
                    tracing::debug!("Request rejected: {}", err);
                } else {
                    tracing::error!("Request failed: {} ({:?})", err, err.category());
                }
                err.to_string()
            }
        };
        let body = serde_json::json!({ "code": code, "message": message });
        (status, Json(body)).into_response()
    }
}
