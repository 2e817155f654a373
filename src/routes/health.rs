use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde_json::json;

use crate::models::health::HealthResponse;
use crate::state::AppState;

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Electronics Hub API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        success: true,
        message: "Server is healthy".to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    use crate::test_support;

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::app_state()))
                .service(root)
                .service(health_check),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Server is healthy");
        assert!(body["uptime"].is_u64());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Electronics Hub API is running");
    }
}
