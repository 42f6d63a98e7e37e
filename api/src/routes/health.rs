use actix_web::HttpResponse;

use crate::dto::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "OTP Verification API is running".to_string(),
    })
}
