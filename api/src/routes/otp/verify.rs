use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::repositories::{OtpRepository, UserRepository};
use otp_shared::ApiResponse;

use crate::dto::{OtpVerifiedResponse, VerifyOtpRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::AppState;

/// Handler for POST /api/otp/verify
///
/// # Request Body
///
/// ```json
/// { "otp_id": "2f0c7d3e-…", "otp_code": "042917" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP verified successfully",
///     "data": {
///         "verified": true,
///         "user_id": "9b1e…",
///         "email": "",
///         "phone": "+15551234567",
///         "timestamp": "2025-01-01T10:01:12Z"
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Already verified, expired, attempts exhausted, wrong or malformed code
/// - 404 Not Found: Unknown `otp_id`
pub async fn verify_otp<R, U>(
    state: web::Data<AppState<R, U>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .otp_service
        .verify(&request.otp_id, &request.otp_code)
        .await
    {
        Ok(verified) => HttpResponse::Ok().json(ApiResponse::success(
            "OTP verified successfully",
            OtpVerifiedResponse::from(verified),
        )),
        Err(error) => handle_domain_error(error),
    }
}
