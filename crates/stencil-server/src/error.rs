//! Request error responses
//!
//! Every failure leaves the handler as a JSON body `{ "kind", "message" }`
//! with a status code derived from the error kind.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use stencil_core::StencilError;

#[derive(Debug)]
pub enum ApiError {
    /// Pipeline failure
    Stencil(StencilError),
    /// Uploaded file is not declared as an image
    UnsupportedMediaType(String),
    /// Malformed or oversized multipart body
    Multipart(MultipartError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: String,
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::Stencil(StencilError::InvalidInput(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Stencil(
                StencilError::PayloadTooLarge { .. } | StencilError::TooManyPages { .. },
            ) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Stencil(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Stencil(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Multipart(err) => err.status(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Stencil(err) => err.kind(),
            ApiError::UnsupportedMediaType(_) => "unsupported_media_type",
            ApiError::Multipart(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "payload_too_large"
            }
            ApiError::Multipart(_) => "invalid_input",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Stencil(err) => err.to_string(),
            ApiError::UnsupportedMediaType(content_type) => format!(
                "Expected an image upload, got content type '{}'",
                content_type
            ),
            ApiError::Multipart(err) => err.body_text(),
        }
    }
}

impl From<StencilError> for ApiError {
    fn from(err: StencilError) -> Self {
        ApiError::Stencil(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            kind: self.kind(),
            message: self.message(),
        };

        if status.is_server_error() {
            tracing::error!(kind = body.kind, "{}", body.message);
        } else {
            tracing::warn!(kind = body.kind, status = status.as_u16(), "{}", body.message);
        }

        (status, Json(body)).into_response()
    }
}
