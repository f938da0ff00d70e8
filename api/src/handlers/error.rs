//! Mapping from domain errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use sg_core::errors::{DomainError, ErrorCategory};
use sg_shared::{error_codes, ErrorResponse, LockedResponse};
use validator::ValidationErrors;

/// Convert a [`DomainError`] into the JSON error body and status for it
///
/// Credential and token failures keep their uniform messages. Dependency
/// and internal failures are logged here and answered with a generic text.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    if let DomainError::RateLimited {
        lock_type,
        locked_until,
    } = &error
    {
        return HttpResponse::TooManyRequests().json(LockedResponse::new(lock_type.as_str(), *locked_until));
    }

    let (status, code, message) = match error.category() {
        ErrorCategory::Validation => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            error.to_string(),
        ),
        ErrorCategory::Authentication => {
            let code = if error.is_invalid_token() {
                error_codes::INVALID_TOKEN
            } else {
                error_codes::INVALID_CREDENTIALS
            };
            (StatusCode::UNAUTHORIZED, code, error.to_string())
        }
        ErrorCategory::Forbidden => {
            let code = match &error {
                DomainError::Auth(sg_core::errors::AuthError::UserStatusInvalid) => {
                    error_codes::USER_STATUS_INVALID
                }
                _ => error_codes::FORBIDDEN,
            };
            (StatusCode::FORBIDDEN, code, error.to_string())
        }
        ErrorCategory::Conflict => (StatusCode::CONFLICT, error_codes::PHONE_EXISTS, error.to_string()),
        ErrorCategory::NotFound => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, error.to_string()),
        ErrorCategory::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            error_codes::TOO_MANY_FAILED_ATTEMPTS,
            "too many failed attempts".to_string(),
        ),
        ErrorCategory::DependencyUnavailable => {
            tracing::error!(error = %error, "Dependency unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::SERVICE_UNAVAILABLE,
                "service temporarily unavailable".to_string(),
            )
        }
        ErrorCategory::Internal => {
            tracing::error!(error = %error, "Internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "an internal error occurred".to_string(),
            )
        }
    };

    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// 400 with one `details` entry per offending field
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    let mut body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "invalid request");
    for (field, field_errors) in errors.field_errors() {
        let reasons: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        body = body.add_detail(field, reasons);
    }
    HttpResponse::BadRequest().json(body)
}
