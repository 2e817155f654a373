use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated caller, extracted from `Authorization: Bearer <token>`.
/// Used as an extractor by every protected route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

/// Like `AuthUser` but never rejects: a missing or invalid token yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    // 1. Pull the token out of the header
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided.".to_string()))?;

    // 2. Verify it against the access secret
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state is not registered".to_string()))?;

    let claims = jwt::verify_access_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Forbidden("Invalid or expired token.".to_string())
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for MaybeAuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeAuthUser(authenticate(req).ok())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    use crate::test_support;

    fn state() -> web::Data<AppState> {
        web::Data::new(test_support::app_state())
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let req = TestRequest::default().app_data(state()).to_http_request();
        assert!(matches!(authenticate(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_scheme_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(state())
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert!(matches!(authenticate(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_bad_token_is_forbidden() {
        let req = TestRequest::default()
            .app_data(state())
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_http_request();
        assert!(matches!(authenticate(&req), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_valid_token() {
        let state = state();
        let token = test_support::bearer_for(&state, 42, "ana@example.com");
        let req = TestRequest::default()
            .app_data(state)
            .insert_header(("Authorization", token))
            .to_http_request();

        let user = authenticate(&req).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "ana@example.com");
    }
}
