//! Process-wide dependencies, constructed once at boot and shared through
//! `web::Data<AppState>`.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::services::notification::NotificationSender;
use crate::services::payment_gateway::PaymentGateway;
use crate::services::payment_service::SignatureVerifier;

pub struct AppState {
    pub config: AppConfig,
    pub notifier: Arc<dyn NotificationSender>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub verifier: SignatureVerifier,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        notifier: Arc<dyn NotificationSender>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            config,
            notifier,
            gateway,
            verifier,
            started_at: Instant::now(),
        }
    }
}
