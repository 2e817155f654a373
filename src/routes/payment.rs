use actix_web::{HttpResponse, get, post, web};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreatePaymentOrderRequest, VerifyPaymentRequest};
use crate::services::PaymentService;
use crate::services::payment_gateway::GatewayError;
use crate::state::AppState;

/// GET /api/payment/key - public key for the checkout sheet (PUBLIC)
#[get("/key")]
pub async fn get_key(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let key = state.gateway.key_id().ok_or(GatewayError::NotConfigured)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "key": key,
    })))
}

/// POST /api/payment/create-order
#[post("/create-order")]
pub async fn create_payment_order(
    auth_user: AuthUser,
    body: web::Json<CreatePaymentOrderRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order = PaymentService::create_gateway_order(
        db.get_ref(),
        state.gateway.as_ref(),
        auth_user.user_id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Razorpay order created successfully",
        "data": order,
    })))
}

/// POST /api/payment/verify - signature check only, the order is placed separately
#[post("/verify")]
pub async fn verify_payment(
    _auth_user: AuthUser,
    body: web::Json<VerifyPaymentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let verified = PaymentService::verify_payment(&state.verifier, body.into_inner())?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Payment verified successfully",
        "data": verified,
    })))
}

pub fn payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payment")
            .service(get_key)
            .service(create_payment_order)
            .service(verify_payment),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use crate::test_support::{self, TEST_PAYMENT_SECRET};

    #[actix_web::test]
    async fn test_key_and_verify() {
        let db = test_support::setup_db().await;
        let user = test_support::seed_user(&db, "Ana", "ana@example.com").await;
        let state = test_support::app_state();
        let bearer = test_support::bearer_for(&state, user.id, &user.email);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure_app),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/payment/key").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["key"], "rzp_test_key");

        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_PAYMENT_SECRET.as_bytes()).unwrap();
        mac.update(b"order_1|pay_1");
        let signature = hex::encode(mac.finalize().into_bytes());

        let req = test::TestRequest::post()
            .uri("/api/payment/verify")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": signature,
                "address_id": 1,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/api/payment/verify")
            .insert_header(("Authorization", bearer))
            .set_json(json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_2",
                "razorpay_signature": signature,
                "address_id": 1,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid payment signature");
    }
}
