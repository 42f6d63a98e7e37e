use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::repositories::{OtpRepository, UserRepository};
use otp_shared::ApiResponse;

use crate::dto::{OtpIssuedResponse, ResendOtpRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::AppState;

/// Handler for POST /api/otp/resend
///
/// Issues a new code to the contact of an existing, unverified record. The
/// response has the same shape as generate.
///
/// ## Errors
/// - 400 Bad Request: Record already verified
/// - 404 Not Found: Unknown `otp_id`
/// - 429 Too Many Requests: Rate limit for this contact reached
pub async fn resend_otp<R, U>(
    state: web::Data<AppState<R, U>>,
    request: web::Json<ResendOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.otp_service.resend(&request.otp_id).await {
        Ok(issued) => HttpResponse::Ok().json(ApiResponse::success(
            "OTP resent successfully",
            OtpIssuedResponse::from(issued),
        )),
        Err(error) => handle_domain_error(error),
    }
}
