//! Payment gateway capability and its Razorpay implementation.
//!
//! The gateway only creates payment intents; money movement happens between
//! the client and Razorpay, and the server later checks the signature.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RazorpayConfig;

const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Payment gateway is not configured")]
    NotConfigured,
}

/// Amount is in the currency's minor unit (paise for INR)
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the client to open the payment sheet
    fn key_id(&self) -> Option<&str>;

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

pub struct RazorpayClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> Option<&str> {
        Some(&self.key_id)
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .client
            .post(RAZORPAY_ORDERS_URL)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let order: GatewayOrder = response.json().await?;
        tracing::info!(gateway_order_id = %order.id, amount = order.amount, "Razorpay order created");
        Ok(order)
    }
}

/// Stands in when Razorpay credentials are missing.
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    fn key_id(&self) -> Option<&str> {
        None
    }

    async fn create_order(&self, _request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
