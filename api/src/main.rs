use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use otp_api::app::create_app;
use otp_api::routes::otp::AppState;
use otp_core::services::otp::{OtpService, OtpServiceConfig};
use otp_infra::{create_notifier, DatabasePool, MySqlOtpRepository, MySqlUserRepository};
use otp_shared::config::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        expose_code = config.expose_code(),
        "Starting OTP verification API"
    );

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    if config.database.run_migrations {
        pool.run_migrations()
            .await
            .context("Failed to run database migrations")?;
    }

    let notifier = create_notifier(&config.sms).context("Failed to initialize SMS notifier")?;
    match (&notifier, config.sms.twilio_account_sid.as_deref()) {
        (Some(notifier), Some(sid)) => tracing::info!(
            provider = notifier.provider_name(),
            account_sid = %mask_sid(sid),
            "SMS notifier configured"
        ),
        (Some(notifier), None) => {
            tracing::info!(provider = notifier.provider_name(), "SMS notifier configured")
        }
        (None, _) => tracing::warn!("SMS notifier not configured; SMS delivery disabled"),
    }

    let otp_repository = Arc::new(MySqlOtpRepository::new(pool.get_pool().clone()));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let otp_service = Arc::new(
        OtpService::new(
            otp_repository,
            user_repository,
            OtpServiceConfig::from_policy(&config.otp, config.expose_code()),
        )
        .with_notifier(notifier),
    );
    let app_state = web::Data::new(AppState::new(otp_service));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind to address");

    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors, max_payload_size))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server error")?;

    pool.close().await;
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

fn mask_sid(sid: &str) -> String {
    let visible: String = sid.chars().take(6).collect();
    format!("{}****", visible)
}
