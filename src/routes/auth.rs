use actix_web::{HttpResponse, get, post, web};
use sea_orm::DatabaseConnection;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{
    EmailRequest, LoginRequest, RefreshTokenRequest, ResetPasswordRequest, SignupRequest, VerifyEmailQuery,
};
use crate::services::{AccountService, AuthService};
use crate::state::AppState;

/// POST /api/auth/signup - Create an account (PUBLIC)
#[post("/signup")]
pub async fn signup(
    body: web::Json<SignupRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let payload = AuthService::signup(
        db.get_ref(),
        state.notifier.as_ref(),
        &state.config.jwt,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Account created successfully! Please check your email to verify your account.",
        "data": payload,
    })))
}

/// POST /api/auth/login - Sign in (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let payload = AuthService::login(db.get_ref(), &state.config.jwt, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "data": payload,
    })))
}

/// GET /api/auth/verify-email?token=xxx (PUBLIC)
#[get("/verify-email")]
pub async fn verify_email(
    query: web::Query<VerifyEmailQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    AuthService::verify_email(db.get_ref(), query.token.as_deref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Email verified successfully! You can now use all features.",
    })))
}

/// POST /api/auth/resend-verification (PUBLIC)
#[post("/resend-verification")]
pub async fn resend_verification(
    body: web::Json<EmailRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::resend_verification(db.get_ref(), state.notifier.as_ref(), &body.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Verification email sent successfully",
    })))
}

/// POST /api/auth/forgot-password (PUBLIC)
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<EmailRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::forgot_password(db.get_ref(), state.notifier.as_ref(), &body.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "If an account with that email exists, a password reset link has been sent.",
    })))
}

/// POST /api/auth/reset-password (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::reset_password(db.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password reset successful! You can now login with your new password.",
    })))
}

/// POST /api/auth/refresh-token (PUBLIC)
#[post("/refresh-token")]
pub async fn refresh_token(
    body: web::Json<RefreshTokenRequest>,
    db: web::Data<DatabaseConnection>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tokens = AuthService::refresh(db.get_ref(), &state.config.jwt, &body.refresh_token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "tokens": tokens },
    })))
}

/// GET /api/auth/me (PROTECTED)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let user = AccountService::profile(db.get_ref(), auth_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": user,
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(signup)
            .service(login)
            .service(verify_email)
            .service(resend_verification)
            .service(forgot_password)
            .service(reset_password)
            .service(refresh_token)
            .service(me),
    );
}
