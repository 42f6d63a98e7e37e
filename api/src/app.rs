//! Application factory
//!
//! Builds the Actix-web application from the shared state and CORS
//! configuration. Used by the server binary and by integration tests.

use actix_web::{web, App};
use tracing_actix_web::TracingLogger;

use otp_core::repositories::{OtpRepository, UserRepository};
use otp_shared::config::CorsConfig;

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::create_cors;
use crate::routes::health::health_check;
use crate::routes::otp::{
    generate::generate_otp, resend::resend_otp, verify::verify_otp, AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<R, U>(
    app_state: web::Data<AppState<R, U>>,
    cors: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware order: CORS runs inside the request span
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/otp")
                .route("/generate", web::post().to(generate_otp::<R, U>))
                .route("/verify", web::post().to(verify_otp::<R, U>))
                .route("/resend", web::post().to(resend_otp::<R, U>)),
        )
        .default_service(web::route().to(not_found))
}
