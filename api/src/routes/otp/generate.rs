use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::domain::entities::Contact;
use otp_core::errors::DomainError;
use otp_core::repositories::{OtpRepository, UserRepository};
use otp_shared::ApiResponse;

use crate::dto::{GenerateOtpRequest, OtpIssuedResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::AppState;

/// Handler for POST /api/otp/generate
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com" }
/// ```
/// or
/// ```json
/// { "phone": "+15551234567" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully",
///     "data": {
///         "otp_id": "2f0c7d3e-…",
///         "expires_at": "2025-01-01T10:05:00Z",
///         "sms_status": "sent",
///         "otp_code": "042917"
///     }
/// }
/// ```
/// `otp_code` is only present outside production.
///
/// ## Errors
/// - 400 Bad Request: Missing, conflicting or malformed contact
/// - 429 Too Many Requests: Rate limit for this contact reached
/// - 500/503: Randomness or storage failure
pub async fn generate_otp<R, U>(
    state: web::Data<AppState<R, U>>,
    request: web::Json<GenerateOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let contact = match Contact::from_parts(request.email.as_deref(), request.phone.as_deref()) {
        Ok(contact) => contact,
        Err(e) => return handle_domain_error(DomainError::from(e)),
    };

    match state.otp_service.generate(contact).await {
        Ok(issued) => HttpResponse::Ok().json(ApiResponse::success(
            "OTP sent successfully",
            OtpIssuedResponse::from(issued),
        )),
        Err(error) => handle_domain_error(error),
    }
}
