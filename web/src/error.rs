use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::*;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

use crate::response::ErrorResponse;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match &self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
                InternalErrorKind::Conflict(_) => StatusCode::CONFLICT,
                InternalErrorKind::Config(_) | InternalErrorKind::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            // Provider failures are reported as plain server errors rather than 502s.
            DomainErrorKind::External(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {status}: {}", self.0);
        } else {
            debug!("Request rejected with {status}: {}", self.0.message());
        }

        let body = ErrorResponse {
            error: self.0.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
