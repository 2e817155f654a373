use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{AddToCartRequest, UpdateCartItemRequest};
use crate::services::CartService;
use crate::state::AppState;

/// GET /api/cart
#[get("")]
pub async fn get_cart(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let cart = CartService::get_cart(db.get_ref(), auth_user.user_id, state.config.delivery_charge).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": cart.items.len(),
        "data": cart,
    })))
}

/// POST /api/cart
#[post("")]
pub async fn add_to_cart(
    auth_user: AuthUser,
    body: web::Json<AddToCartRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let line = CartService::add_to_cart(db.get_ref(), auth_user.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Item added to cart successfully",
        "data": line,
    })))
}

/// PUT /api/cart/{id}
#[put("/{id}")]
pub async fn update_cart_item(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateCartItemRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let line = CartService::update_cart_item(db.get_ref(), auth_user.user_id, path.into_inner(), body.quantity).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Cart updated successfully",
        "data": line,
    })))
}

/// DELETE /api/cart/{id}
#[delete("/{id}")]
pub async fn remove_from_cart(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    CartService::remove_from_cart(db.get_ref(), auth_user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Item removed from cart successfully",
    })))
}

/// DELETE /api/cart
#[delete("")]
pub async fn clear_cart(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    CartService::clear_cart(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Cart cleared successfully",
    })))
}

pub fn cart_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .service(get_cart)
            .service(add_to_cart)
            .service(clear_cart)
            .service(update_cart_item)
            .service(remove_from_cart),
    );
}
