mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::notification::{DisabledSender, NotificationSender, SendGridSender};
use crate::services::payment_gateway::{PaymentGateway, RazorpayClient, UnconfiguredGateway};
use crate::services::payment_service::SignatureVerifier;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {e}")))?;
    tracing::info!("Database connected");

    let notifier: Arc<dyn NotificationSender> = match &config.email.sendgrid_api_key {
        Some(key) => Arc::new(SendGridSender::new(&config.email, key.clone(), &config.frontend_url)),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set, emails will be logged and dropped");
            Arc::new(DisabledSender)
        }
    };

    let gateway: Arc<dyn PaymentGateway> = match &config.razorpay {
        Some(razorpay) => Arc::new(RazorpayClient::new(razorpay)),
        None => {
            tracing::warn!("Razorpay credentials not set, online payments are disabled");
            Arc::new(UnconfiguredGateway)
        }
    };
    let verifier = SignatureVerifier::new(config.razorpay.as_ref().map(|r| r.key_secret.clone()));

    let bind = (config.host.clone(), config.port);
    let frontend_url = config.frontend_url.clone();
    let state = web::Data::new(AppState::new(config, notifier, gateway, verifier));
    let db = web::Data::new(db);

    tracing::info!("Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(state.clone())
            .configure(routes::configure_app)
    })
    .bind(bind)?
    .run()
    .await
}
