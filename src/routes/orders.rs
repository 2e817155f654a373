use actix_web::{HttpResponse, get, post, put, web};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::CreateOrderRequest;
use crate::services::OrderService;
use crate::state::AppState;

/// POST /api/orders - Checkout the cart
#[post("")]
pub async fn create_order(
    auth_user: AuthUser,
    body: web::Json<CreateOrderRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let placed = OrderService::create_order(
        db.get_ref(),
        state.notifier.as_ref(),
        state.config.delivery_charge,
        auth_user.user_id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Order placed successfully",
        "data": placed,
    })))
}

/// GET /api/orders
#[get("")]
pub async fn get_orders(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let orders = OrderService::list_orders(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": orders.len(),
        "data": orders,
    })))
}

/// GET /api/orders/{id}
#[get("/{id}")]
pub async fn get_order(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let order = OrderService::get_order(db.get_ref(), auth_user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": order,
    })))
}

/// PUT /api/orders/{id}/cancel
#[put("/{id}/cancel")]
pub async fn cancel_order(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    OrderService::cancel_order(db.get_ref(), auth_user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Order cancelled successfully",
    })))
}

pub fn orders_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(create_order)
            .service(get_orders)
            .service(get_order)
            .service(cancel_order),
    );
}
