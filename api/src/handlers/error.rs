use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use otp_core::errors::{DomainError, OtpError};
use otp_shared::{error_codes, ApiResponse, ErrorResponse};

/// Status code and stable error code for a domain error
pub fn status_and_code(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Otp(otp) => match otp {
            OtpError::InvalidInput(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            OtpError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT_EXCEEDED)
            }
            OtpError::NotFound => (StatusCode::NOT_FOUND, error_codes::OTP_NOT_FOUND),
            OtpError::AlreadyVerified => {
                (StatusCode::BAD_REQUEST, error_codes::OTP_ALREADY_VERIFIED)
            }
            OtpError::Expired => (StatusCode::BAD_REQUEST, error_codes::OTP_EXPIRED),
            OtpError::AttemptsExceeded => {
                (StatusCode::BAD_REQUEST, error_codes::OTP_ATTEMPTS_EXCEEDED)
            }
            OtpError::CodeMismatch { .. } => {
                (StatusCode::BAD_REQUEST, error_codes::OTP_CODE_MISMATCH)
            }
            OtpError::RandomnessUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::RANDOMNESS_UNAVAILABLE,
            ),
        },
        DomainError::Storage { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, error_codes::STORAGE_UNAVAILABLE)
        }
    }
}

/// Handle domain errors and convert them to the response envelope
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code) = status_and_code(&error);
    let mut body = ErrorResponse::new(code);

    let message = match &error {
        DomainError::Otp(otp) => {
            match otp {
                OtpError::CodeMismatch { remaining_attempts } => {
                    body = body.add_detail("remaining_attempts", remaining_attempts);
                }
                OtpError::RateLimited { window_minutes } => {
                    body = body.add_detail("window_minutes", window_minutes);
                }
                _ => {}
            }
            otp.to_string()
        }
        DomainError::Storage { message } => {
            tracing::error!(error = %message, "Storage failure while handling request");
            "Service temporarily unavailable. Please try again later".to_string()
        }
    };

    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), code, "Request failed");
    } else {
        tracing::debug!(status = status.as_u16(), code, "Request rejected");
    }

    HttpResponse::build(status).json(ApiResponse::failure(message, body))
}

/// 400 envelope carrying per-field validation errors
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR)
        .add_detail("validation_errors", errors);
    HttpResponse::BadRequest().json(ApiResponse::failure("Invalid request data", body))
}

/// Turns JSON body errors into the same 400 envelope as validation failures
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::BAD_REQUEST).add_detail("reason", err.to_string());
    let response = HttpResponse::BadRequest().json(ApiResponse::failure("Invalid request data", body));
    InternalError::from_response(err, response).into()
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure(
        "The requested resource was not found",
        ErrorResponse::new(error_codes::NOT_FOUND),
    ))
}
