//! HTTP error mapping.
//!
//! The domain [`Error`] is transport agnostic; this module maps it onto Actix
//! responses by implementing [`ResponseError`], translating the stable
//! [`ErrorCode`] into an HTTP status and serialising the error envelope as
//! JSON. The request-scoped trace identifier is attached to responses by the
//! tracing middleware, so it is not re-inserted here.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{Error, ErrorCode};

/// Convenience alias for HTTP handlers returning the domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}
