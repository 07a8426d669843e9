//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use remarks_core::DomainError;
use remarks_shared::ErrorResponse;
use std::fmt;

use crate::observability::RequestId;

/// Which problem a failed request ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Internal,
}

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    detail: String,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: &RequestId) -> Self {
        self.request_id = Some(request_id.as_str().to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ErrorKind::NotFound => "Not found",
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::Internal => "Internal error",
        };
        write!(f, "{}: {}", label, self.detail)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = match self.kind {
            ErrorKind::NotFound => ErrorResponse::not_found(&self.detail),
            ErrorKind::BadRequest => ErrorResponse::bad_request(&self.detail),
            ErrorKind::Forbidden => ErrorResponse::forbidden(&self.detail),
            ErrorKind::Internal => {
                tracing::error!(
                    request_id = self.request_id.as_deref(),
                    "Internal error: {}",
                    self.detail
                );
                ErrorResponse::internal_error()
            }
        };
        if let Some(id) = &self.request_id {
            body = body.with_request_id(id);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::new(ErrorKind::BadRequest, msg),
            e @ DomainError::NotFound(_) => Self::new(ErrorKind::NotFound, e.to_string()),
            DomainError::RuleViolation(msg) => Self::new(ErrorKind::Forbidden, msg),
            DomainError::Storage(e) => Self::new(ErrorKind::Internal, e.to_string()),
        }
    }
}

/// Convert a domain result into a handler result whose error carries the
/// request ID.
pub trait Traced<T> {
    fn traced(self, request_id: &RequestId) -> AppResult<T>;
}

impl<T> Traced<T> for Result<T, DomainError> {
    fn traced(self, request_id: &RequestId) -> AppResult<T> {
        self.map_err(|e| AppError::from(e).with_request_id(request_id))
    }
}

/// 400 problem details for a rejected payload, tagged with the request ID when known.
fn payload_rejected(detail: String, req: &HttpRequest) -> actix_web::Error {
    let mut err = AppError::new(ErrorKind::BadRequest, detail);
    if let Some(id) = req.extensions().get::<RequestId>() {
        err = err.with_request_id(id);
    }

    tracing::debug!(detail = %err.detail, "Rejected request payload");
    err.into()
}

/// Turn malformed JSON bodies into problem details.
pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    payload_rejected(err.to_string(), req)
}

/// Turn malformed query strings into problem details.
pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    payload_rejected(err.to_string(), req)
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
