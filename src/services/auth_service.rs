use chrono::Utc;
use sea_orm::*;

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::models::dto::{AuthPayload, LoginRequest, ResetPasswordRequest, SignupRequest, TokenPair, UserView};
use crate::models::users;
use crate::services::notification::NotificationSender;
use crate::utils::tokens::{self, EMAIL_VERIFICATION_TTL_HOURS, PASSWORD_RESET_TTL_HOURS};
use crate::utils::{jwt, password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Creates an unverified account and signs the user in.
    /// The verification email is best-effort.
    pub async fn signup(
        db: &DatabaseConnection,
        notifier: &dyn NotificationSender,
        jwt_config: &JwtConfig,
        req: SignupRequest,
    ) -> Result<AuthPayload, AppError> {
        let name = req.name.trim().to_string();
        let email = req.email.trim().to_string();

        // 1. Email must be free
        if find_by_email(db, &email).await?.is_some() {
            return Err(AppError::Validation("User with this email already exists".to_string()));
        }

        // 2. Create the user with a verification token
        let verification_token = tokens::generate_token();
        let user = users::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(password::hash_password(&req.password)),
            is_email_verified: Set(false),
            email_verification_token: Set(Some(verification_token.clone())),
            email_verification_expires: Set(Some(tokens::expires_in(EMAIL_VERIFICATION_TTL_HOURS))),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(user_id = user.id, "User signed up");

        // 3. Verification email, failure only logged
        if let Err(e) = notifier
            .send_verification(&user.email, &user.name, &verification_token)
            .await
        {
            tracing::warn!(user_id = user.id, error = %e, "Failed to send verification email");
        }

        // 4. Tokens
        let tokens = issue_tokens(&user, jwt_config)?;
        Ok(AuthPayload {
            user: UserView::from(user),
            tokens,
        })
    }

    pub async fn login(db: &DatabaseConnection, jwt_config: &JwtConfig, req: LoginRequest) -> Result<AuthPayload, AppError> {
        let user = find_by_email(db, req.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let valid = password::verify_password(&req.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash unusable: {e}")))?;
        if !valid {
            tracing::debug!(user_id = user.id, "Login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let tokens = issue_tokens(&user, jwt_config)?;
        Ok(AuthPayload {
            user: UserView::from(user),
            tokens,
        })
    }

    /// Consumes a verification token
    pub async fn verify_email(db: &DatabaseConnection, token: Option<&str>) -> Result<(), AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Verification token is required".to_string()))?;

        let user = users::Entity::find()
            .filter(users::Column::EmailVerificationToken.eq(token))
            .filter(users::Column::EmailVerificationExpires.gt(Utc::now().naive_utc()))
            .one(db)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid or expired verification token".to_string()))?;

        let user_id = user.id;
        let mut active: users::ActiveModel = user.into();
        active.is_email_verified = Set(true);
        active.email_verification_token = Set(None);
        active.email_verification_expires = Set(None);
        active.update(db).await?;

        tracing::info!(user_id, "Email verified");
        Ok(())
    }

    /// Issues a fresh verification token. Sending it is the whole point,
    /// so a delivery failure is reported.
    pub async fn resend_verification(
        db: &DatabaseConnection,
        notifier: &dyn NotificationSender,
        email: &str,
    ) -> Result<(), AppError> {
        let user = find_by_email(db, email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if user.is_email_verified {
            return Err(AppError::InvalidState("Email is already verified".to_string()));
        }

        let token = tokens::generate_token();
        let mut active: users::ActiveModel = user.into();
        active.email_verification_token = Set(Some(token.clone()));
        active.email_verification_expires = Set(Some(tokens::expires_in(EMAIL_VERIFICATION_TTL_HOURS)));
        let user = active.update(db).await?;

        notifier.send_verification(&user.email, &user.name, &token).await?;
        Ok(())
    }

    /// Always succeeds so callers cannot probe which emails are registered.
    pub async fn forgot_password(
        db: &DatabaseConnection,
        notifier: &dyn NotificationSender,
        email: &str,
    ) -> Result<(), AppError> {
        let Some(user) = find_by_email(db, email.trim()).await? else {
            return Ok(());
        };

        let token = tokens::generate_token();
        let mut active: users::ActiveModel = user.into();
        active.password_reset_token = Set(Some(token.clone()));
        active.password_reset_expires = Set(Some(tokens::expires_in(PASSWORD_RESET_TTL_HOURS)));
        let user = active.update(db).await?;

        if let Err(e) = notifier.send_password_reset(&user.email, &user.name, &token).await {
            tracing::warn!(user_id = user.id, error = %e, "Failed to send password reset email");
        }
        Ok(())
    }

    pub async fn reset_password(db: &DatabaseConnection, req: ResetPasswordRequest) -> Result<(), AppError> {
        let user = users::Entity::find()
            .filter(users::Column::PasswordResetToken.eq(req.token.as_str()))
            .filter(users::Column::PasswordResetExpires.gt(Utc::now().naive_utc()))
            .one(db)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid or expired reset token".to_string()))?;

        let user_id = user.id;
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password::hash_password(&req.new_password));
        active.password_reset_token = Set(None);
        active.password_reset_expires = Set(None);
        active.update(db).await?;

        tracing::info!(user_id, "Password reset");
        Ok(())
    }

    /// Exchanges a refresh token for a new pair, as long as the user still exists.
    pub async fn refresh(db: &DatabaseConnection, jwt_config: &JwtConfig, refresh_token: &str) -> Result<TokenPair, AppError> {
        if refresh_token.is_empty() {
            return Err(AppError::Validation("Refresh token is required".to_string()));
        }

        let claims = jwt::verify_refresh_token(refresh_token, jwt_config)
            .map_err(|_| AppError::Forbidden("Invalid or expired refresh token".to_string()))?;

        let user = users::Entity::find_by_id(claims.sub)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        issue_tokens(&user, jwt_config)
    }
}

async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

fn issue_tokens(user: &users::Model, jwt_config: &JwtConfig) -> Result<TokenPair, AppError> {
    jwt::generate_token_pair(user.id, &user.email, jwt_config)
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}
