use actix_web::{HttpResponse, get, web};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::models::dto::{HistoryQuery, SearchQuery};
use crate::services::CatalogService;

/// GET /api/products - newest first (PUBLIC)
#[get("")]
pub async fn get_products(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let products = CatalogService::list_products(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": products.len(),
        "data": products,
    })))
}

/// GET /api/products/categories/all (PUBLIC)
#[get("/categories/all")]
pub async fn get_categories(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let categories = CatalogService::categories(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": categories.len(),
        "data": categories,
    })))
}

/// GET /api/products/search?q= (PUBLIC, logs the term for signed-in callers)
#[get("/search")]
pub async fn search_products(
    caller: MaybeAuthUser,
    query: web::Query<SearchQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let term = query.q.as_deref();
    let products = CatalogService::search(db.get_ref(), term, caller.0.map(|u| u.user_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "query": term.map(str::trim),
        "count": products.len(),
        "data": products,
    })))
}

/// GET /api/products/search/history?limit= (PROTECTED)
#[get("/search/history")]
pub async fn get_search_history(
    auth_user: AuthUser,
    query: web::Query<HistoryQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let terms = CatalogService::search_history(db.get_ref(), auth_user.user_id, query.limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": terms.len(),
        "data": terms,
    })))
}

/// GET /api/products/category/{key} - sorted by name (PUBLIC)
#[get("/category/{key}")]
pub async fn get_products_by_category(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();
    let products = CatalogService::products_by_category(db.get_ref(), &key).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "category": key,
        "count": products.len(),
        "data": products,
    })))
}

/// GET /api/products/{id} (PUBLIC)
#[get("/{id}")]
pub async fn get_product(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let product = CatalogService::get_product(db.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": product,
    })))
}

pub fn products_routes(cfg: &mut web::ServiceConfig) {
    // Fixed segments must be registered before "/{id}"
    cfg.service(
        web::scope("/products")
            .service(get_products)
            .service(get_categories)
            .service(search_products)
            .service(get_search_history)
            .service(get_products_by_category)
            .service(get_product),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use rust_decimal::Decimal;

    use crate::test_support;

    #[actix_web::test]
    async fn test_catalog_endpoints() {
        let db = test_support::setup_db().await;
        test_support::seed_category(&db, "input", "Input Devices").await;
        let mouse = test_support::seed_product_in(&db, "Wireless Mouse", Decimal::from(499), 10, Some("input")).await;
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

        let req = test::TestRequest::get().uri(&format!("/api/products/{}", mouse.id)).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Wireless Mouse");
        assert_eq!(body["data"]["category_name"], "Input Devices");

        let req = test::TestRequest::get().uri("/api/products/categories/all").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);

        let req = test::TestRequest::get()
            .uri("/api/products/search?q=mouse")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);

        let req = test::TestRequest::get()
            .uri("/api/products/search/history")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!(["mouse"]));

        let req = test::TestRequest::get().uri("/api/products/search?q=").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/products/search/history").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/products/9999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
