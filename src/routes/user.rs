use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{NewAddressRequest, UpdateAddressRequest, UpdateProfileRequest};
use crate::services::AccountService;

/// GET /api/user/profile
#[get("/profile")]
pub async fn get_profile(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let user = AccountService::profile(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": user,
    })))
}

/// PUT /api/user/profile - name only
#[put("/profile")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = AccountService::update_profile(db.get_ref(), auth_user.user_id, &body.name).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": user,
    })))
}

/// GET /api/user/addresses
#[get("/addresses")]
pub async fn get_addresses(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let addresses = AccountService::addresses(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": addresses.len(),
        "data": addresses,
    })))
}

/// GET /api/user/addresses/{id}
#[get("/addresses/{id}")]
pub async fn get_address(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let address = AccountService::address(db.get_ref(), auth_user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": address,
    })))
}

/// POST /api/user/addresses
#[post("/addresses")]
pub async fn add_address(
    auth_user: AuthUser,
    body: web::Json<NewAddressRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let address = AccountService::add_address(db.get_ref(), auth_user.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Address added successfully",
        "data": address,
    })))
}

/// PUT /api/user/addresses/{id}
#[put("/addresses/{id}")]
pub async fn update_address(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateAddressRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let address = AccountService::update_address(
        db.get_ref(),
        auth_user.user_id,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Address updated successfully",
        "data": address,
    })))
}

/// DELETE /api/user/addresses/{id}
#[delete("/addresses/{id}")]
pub async fn delete_address(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    AccountService::delete_address(db.get_ref(), auth_user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Address deleted successfully",
    })))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(get_profile)
            .service(update_profile)
            .service(get_addresses)
            .service(get_address)
            .service(add_address)
            .service(update_address)
            .service(delete_address),
    );
}
