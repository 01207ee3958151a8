//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{ success: false, error }`
//! envelope clients expect, with consistent status codes.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned for bodies that are not valid JSON for the endpoint.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Message returned in place of internal error details.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// JSON error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable message.
    #[schema(example = "Class not found or unauthorized")]
    pub error: String,
    /// Stable machine-readable error code.
    pub code: ErrorCode,
    /// Correlation identifier of the failed request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary details, such as the offending field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        Self {
            success: false,
            error: if internal {
                REDACTED_MESSAGE.to_owned()
            } else {
                error.message().to_owned()
            },
            code: error.code(),
            trace_id: error.trace_id().map(str::to_owned),
            details: if internal {
                None
            } else {
                error.details().cloned()
            },
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::UpstreamFailure | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), "internal error returned to client");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorResponse::from(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}

/// Replace Actix's plain-text JSON extractor errors with the error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::error::json_error_handler;
///
/// let app = App::new().app_data(web::JsonConfig::default().error_handler(json_error_handler));
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected malformed JSON body");
    Error::invalid_request(INVALID_BODY_MESSAGE).into()
}
