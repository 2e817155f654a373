//! Transactional email.
//!
//! The rest of the crate only sees the `NotificationSender` capability; the
//! SendGrid client is one implementation, `DisabledSender` the fallback when
//! no API key is configured.

use askama::Template;
use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::utils::tokens::{EMAIL_VERIFICATION_TTL_HOURS, PASSWORD_RESET_TTL_HOURS};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

// HTML bodies are askama templates so user-supplied names are escaped

#[derive(Template)]
#[template(path = "email/verification.html")]
struct VerificationHtml<'a> {
    name: &'a str,
    url: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    name: &'a str,
    url: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    name: &'a str,
    url: &'a str,
    order: &'a OrderConfirmation,
}

/// What the order confirmation email needs to know about the order
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: i32,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_verification(&self, to: &str, name: &str, token: &str) -> Result<(), NotificationError>;

    async fn send_password_reset(&self, to: &str, name: &str, token: &str) -> Result<(), NotificationError>;

    async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order: &OrderConfirmation,
    ) -> Result<(), NotificationError>;
}

/// A rendered email
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn verification_email(frontend_url: &str, name: &str, token: &str) -> Result<Email, NotificationError> {
    let url = format!("{frontend_url}/verify-email?token={token}");
    let html = VerificationHtml {
        name,
        url: &url,
        ttl_hours: EMAIL_VERIFICATION_TTL_HOURS,
    }
    .render()?;
    Ok(Email {
        subject: "Verify Your Email - Electronics Hub".to_string(),
        text: format!(
            "Hi {name},\n\nThank you for signing up with Electronics Hub! Please verify your email by opening the link below:\n\n{url}\n\nThis link will expire in {EMAIL_VERIFICATION_TTL_HOURS} hours.\n\nIf you didn't create an account, please ignore this email.\n\nElectronics Hub Team"
        ),
        html,
    })
}

pub fn password_reset_email(frontend_url: &str, name: &str, token: &str) -> Result<Email, NotificationError> {
    let url = format!("{frontend_url}/reset-password?token={token}");
    let html = PasswordResetHtml {
        name,
        url: &url,
        ttl_hours: PASSWORD_RESET_TTL_HOURS,
    }
    .render()?;
    Ok(Email {
        subject: "Reset Your Password - Electronics Hub".to_string(),
        text: format!(
            "Hi {name},\n\nWe received a request to reset your password. Open the link below to choose a new one:\n\n{url}\n\nThis link will expire in {PASSWORD_RESET_TTL_HOURS} hour.\n\nIf you didn't request a reset, you can ignore this email.\n\nElectronics Hub Team"
        ),
        html,
    })
}

pub fn order_confirmation_email(
    frontend_url: &str,
    name: &str,
    order: &OrderConfirmation,
) -> Result<Email, NotificationError> {
    let url = format!("{frontend_url}/orders/{}", order.order_id);
    let html = OrderConfirmationHtml { name, url: &url, order }.render()?;
    Ok(Email {
        subject: format!("Order Confirmed #{} - Electronics Hub", order.order_id),
        text: format!(
            "Hi {name},\n\nYour order #{} has been placed.\n\nTotal: ₹{}\nPayment: {} ({})\nStatus: {}\n\nTrack it here: {url}\n\nElectronics Hub Team",
            order.order_id, order.total_amount, order.payment_method, order.payment_status, order.order_status
        ),
        html,
    })
}

/// SendGrid v3 mail-send client
pub struct SendGridSender {
    client: reqwest::Client,
    api_key: SecretString,
    from_email: String,
    from_name: String,
    frontend_url: String,
}

impl SendGridSender {
    pub fn new(config: &EmailConfig, api_key: SecretString, frontend_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            frontend_url: frontend_url.to_string(),
        }
    }

    async fn send(&self, to: &str, name: &str, email: Email) -> Result<(), NotificationError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to, "name": name }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html },
            ],
        });

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(to = %to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for SendGridSender {
    async fn send_verification(&self, to: &str, name: &str, token: &str) -> Result<(), NotificationError> {
        self.send(to, name, verification_email(&self.frontend_url, name, token)?).await
    }

    async fn send_password_reset(&self, to: &str, name: &str, token: &str) -> Result<(), NotificationError> {
        self.send(to, name, password_reset_email(&self.frontend_url, name, token)?).await
    }

    async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order: &OrderConfirmation,
    ) -> Result<(), NotificationError> {
        self.send(to, name, order_confirmation_email(&self.frontend_url, name, order)?)
            .await
    }
}

/// Used when no SendGrid key is configured: logs instead of sending.
pub struct DisabledSender;

#[async_trait]
impl NotificationSender for DisabledSender {
    async fn send_verification(&self, to: &str, _name: &str, _token: &str) -> Result<(), NotificationError> {
        tracing::warn!(to = %to, "Email delivery disabled, verification email not sent");
        Ok(())
    }

    async fn send_password_reset(&self, to: &str, _name: &str, _token: &str) -> Result<(), NotificationError> {
        tracing::warn!(to = %to, "Email delivery disabled, password reset email not sent");
        Ok(())
    }

    async fn send_order_confirmation(
        &self,
        to: &str,
        _name: &str,
        order: &OrderConfirmation,
    ) -> Result<(), NotificationError> {
        tracing::warn!(to = %to, order_id = order.order_id, "Email delivery disabled, confirmation not sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_link() {
        let email = verification_email("https://shop.example.com", "Ana", "abc123").unwrap();
        assert!(email.text.contains("https://shop.example.com/verify-email?token=abc123"));
        assert!(email.html.contains("href=\"https://shop.example.com/verify-email?token=abc123\""));
        assert!(email.text.starts_with("Hi Ana,"));
    }

    #[test]
    fn test_reset_link() {
        let email = password_reset_email("http://localhost:3000", "Ana", "tok").unwrap();
        assert!(email.text.contains("http://localhost:3000/reset-password?token=tok"));
    }

    #[test]
    fn test_order_confirmation_content() {
        let order = OrderConfirmation {
            order_id: 7,
            total_amount: Decimal::new(104800, 2),
            payment_method: "COD".to_string(),
            payment_status: "Pending".to_string(),
            order_status: "Placed".to_string(),
        };
        let email = order_confirmation_email("http://localhost:3000", "Ana", &order).unwrap();
        assert_eq!(email.subject, "Order Confirmed #7 - Electronics Hub");
        assert!(email.text.contains("₹1048.00"));
        assert!(email.text.contains("COD (Pending)"));
    }

    #[test]
    fn test_html_escapes_user_name() {
        let name = "<script>alert(1)</script>";
        let order = OrderConfirmation {
            order_id: 7,
            total_amount: Decimal::new(104800, 2),
            payment_method: "COD".to_string(),
            payment_status: "Pending".to_string(),
            order_status: "Placed".to_string(),
        };

        let emails = [
            verification_email("http://localhost:3000", name, "tok").unwrap(),
            password_reset_email("http://localhost:3000", name, "tok").unwrap(),
            order_confirmation_email("http://localhost:3000", name, &order).unwrap(),
        ];
        for email in &emails {
            assert!(!email.html.contains("<script>"));
            assert!(email.html.contains("script"));
            assert!(email.text.contains(name));
        }
    }
}
