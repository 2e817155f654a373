pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod payment;
pub mod products;
pub mod user;

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::error::AppError;

/// Everything the `App` needs: extractor error handlers, routes and the 404 fallback.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .configure(configure_routes)
        .default_service(web::to(not_found));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root)
        .service(health::health_check)
        .service(
            web::scope("/api")
                .configure(auth::auth_routes)
                .configure(user::user_routes)
                .configure(products::products_routes)
                .configure(cart::cart_routes)
                .configure(orders::orders_routes)
                .configure(payment::payment_routes),
        );
}

// Malformed bodies, query strings and path segments get the same envelope as every other error
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Route not found",
        "path": req.path(),
    }))
}
