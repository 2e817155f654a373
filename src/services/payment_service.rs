use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::*;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::addresses;
use crate::models::dto::{CreatePaymentOrderRequest, PaymentOrderView, VerifyPaymentRequest};
use crate::services::payment_gateway::{GatewayError, GatewayOrderRequest, PaymentGateway};

type HmacSha256 = Hmac<Sha256>;

const CURRENCY: &str = "INR";

/// Checks Razorpay checkout signatures: hex(HMAC-SHA256(`order_id|payment_id`, key secret)).
pub struct SignatureVerifier {
    secret: Option<SecretString>,
}

impl SignatureVerifier {
    /// `None` when the gateway is not configured; every verification then fails.
    pub fn new(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<(), AppError> {
        let secret = self
            .secret
            .as_ref()
            .ok_or(AppError::Gateway(GatewayError::NotConfigured))?;

        let expected = hex::decode(signature).map_err(|_| AppError::SignatureInvalid)?;

        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| AppError::Internal(format!("HMAC key rejected: {e}")))?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());

        // verify_slice compares in constant time
        mac.verify_slice(&expected).map_err(|_| AppError::SignatureInvalid)
    }
}

pub struct PaymentService;

/// Checked payment references, echoed back to the client
#[derive(Debug, serde::Serialize)]
pub struct VerifiedPayment {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl PaymentService {
    /// Opens a payment intent at the gateway for an amount in rupees.
    pub async fn create_gateway_order(
        db: &DatabaseConnection,
        gateway: &dyn PaymentGateway,
        user_id: i32,
        req: CreatePaymentOrderRequest,
    ) -> Result<PaymentOrderView, AppError> {
        // 1. Required fields
        let (Some(amount), Some(address_id)) = (req.amount, req.address_id) else {
            return Err(AppError::Validation("Amount and address are required".to_string()));
        };
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("Amount must be greater than zero".to_string()));
        }

        // 2. The address must belong to the caller
        addresses::Entity::find_by_id(address_id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Address"))?;

        let key = gateway
            .key_id()
            .ok_or(AppError::Gateway(GatewayError::NotConfigured))?
            .to_string();

        // 3. Rupees to paise
        let paise = to_minor_units(amount)
            .ok_or_else(|| AppError::Validation("Amount is out of range".to_string()))?;

        let request = GatewayOrderRequest {
            amount: paise,
            currency: CURRENCY.to_string(),
            receipt: format!("order_{}", Uuid::new_v4().simple()),
            payment_capture: 1,
        };

        let order = gateway.create_order(request).await?;
        tracing::info!(user_id, gateway_order_id = %order.id, amount = order.amount, "Payment order created");

        Ok(PaymentOrderView {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key,
        })
    }

    /// Checks the checkout signature. Does not create or change any order.
    pub fn verify_payment(verifier: &SignatureVerifier, req: VerifyPaymentRequest) -> Result<VerifiedPayment, AppError> {
        let (Some(order_id), Some(payment_id), Some(signature), Some(_)) = (
            req.razorpay_order_id.filter(|s| !s.is_empty()),
            req.razorpay_payment_id.filter(|s| !s.is_empty()),
            req.razorpay_signature.filter(|s| !s.is_empty()),
            req.address_id,
        ) else {
            return Err(AppError::Validation("All payment details are required".to_string()));
        };

        verifier.verify(&order_id, &payment_id, &signature)?;

        Ok(VerifiedPayment {
            razorpay_order_id: order_id,
            razorpay_payment_id: payment_id,
            razorpay_signature: signature,
        })
    }
}

fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED).round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, FakeGateway, TEST_PAYMENT_SECRET};

    fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(Some(SecretString::from(TEST_PAYMENT_SECRET.to_string())))
    }

    #[test]
    fn test_valid_signature() {
        let signature = sign("O1", "P1", TEST_PAYMENT_SECRET);
        assert!(verifier().verify("O1", "P1", &signature).is_ok());
    }

    #[test]
    fn test_any_single_character_mutation_is_rejected() {
        let signature = sign("O1", "P1", TEST_PAYMENT_SECRET);
        let verifier = verifier();

        for (i, c) in signature.char_indices() {
            let replacement = if c == '0' { '1' } else { '0' };
            let mut mutated = signature.clone();
            mutated.replace_range(i..i + 1, &replacement.to_string());

            assert!(
                matches!(verifier.verify("O1", "P1", &mutated), Err(AppError::SignatureInvalid)),
                "mutation at {i} accepted"
            );
        }
    }

    #[test]
    fn test_signature_bound_to_ids_and_secret() {
        let verifier = verifier();
        let signature = sign("O1", "P1", TEST_PAYMENT_SECRET);

        assert!(verifier.verify("O1", "P2", &signature).is_err());
        assert!(verifier.verify("O2", "P1", &signature).is_err());
        assert!(verifier.verify("O1", "P1", &sign("O1", "P1", "other")).is_err());
        assert!(verifier.verify("O1", "P1", "not-hex").is_err());
    }

    #[test]
    fn test_unconfigured_verifier() {
        let signature = sign("O1", "P1", TEST_PAYMENT_SECRET);
        let result = SignatureVerifier::new(None).verify("O1", "P1", &signature);
        assert!(matches!(result, Err(AppError::Gateway(GatewayError::NotConfigured))));
    }

    #[test]
    fn test_verify_payment_requires_all_fields() {
        let req = VerifyPaymentRequest {
            razorpay_order_id: Some("O1".into()),
            razorpay_payment_id: Some("P1".into()),
            razorpay_signature: None,
            address_id: Some(1),
        };
        let err = PaymentService::verify_payment(&verifier(), req).unwrap_err();
        assert_eq!(err.to_string(), "All payment details are required");
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(104850, 2)), Some(104850));
        assert_eq!(to_minor_units(Decimal::new(1999, 3)), Some(200));
    }

    #[tokio::test]
    async fn test_create_gateway_order() {
        let db = test_support::setup_db().await;
        let user = test_support::seed_user(&db, "Ana", "ana@example.com").await;
        let address = test_support::seed_address(&db, user.id, true).await;
        let gateway = FakeGateway::default();

        let view = PaymentService::create_gateway_order(
            &db,
            &gateway,
            user.id,
            CreatePaymentOrderRequest {
                amount: Some(Decimal::new(104850, 2)),
                address_id: Some(address.id),
            },
        )
        .await
        .unwrap();

        assert_eq!(view.order_id, "order_test_1");
        assert_eq!(view.amount, 104850);
        assert_eq!(view.currency, "INR");
        assert_eq!(view.key, "rzp_test_key");

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].payment_capture, 1);
        assert!(requests[0].receipt.starts_with("order_"));
    }

    #[tokio::test]
    async fn test_create_gateway_order_rejects_foreign_address() {
        let db = test_support::setup_db().await;
        let owner = test_support::seed_user(&db, "Ana", "ana@example.com").await;
        let other = test_support::seed_user(&db, "Ravi", "ravi@example.com").await;
        let address = test_support::seed_address(&db, owner.id, true).await;
        let gateway = FakeGateway::default();

        let err = PaymentService::create_gateway_order(
            &db,
            &gateway,
            other.id,
            CreatePaymentOrderRequest {
                amount: Some(Decimal::from(100)),
                address_id: Some(address.id),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_gateway_order_requires_amount() {
        let db = test_support::setup_db().await;
        let err = PaymentService::create_gateway_order(
            &db,
            &FakeGateway::default(),
            1,
            CreatePaymentOrderRequest { amount: None, address_id: Some(1) },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Amount and address are required");
    }
}
