use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::models::dto::TokenPair;

pub type JwtError = jsonwebtoken::errors::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub email: String,
    pub exp: i64, // expiration timestamp
}

fn sign(user_id: i32, email: &str, secret: &SecretString, ttl: Duration) -> Result<String, JwtError> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
}

fn verify(token: &str, secret: &SecretString) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// Issues an access token and a refresh token for a user
pub fn generate_token_pair(user_id: i32, email: &str, config: &JwtConfig) -> Result<TokenPair, JwtError> {
    Ok(TokenPair {
        access_token: sign(user_id, email, &config.access_secret, config.access_ttl)?,
        refresh_token: sign(user_id, email, &config.refresh_secret, config.refresh_ttl)?,
    })
}

pub fn verify_access_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    verify(token, &config.access_secret)
}

pub fn verify_refresh_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    verify(token, &config.refresh_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: SecretString::from("access-secret".to_string()),
            access_ttl: Duration::hours(1),
            refresh_secret: SecretString::from("refresh-secret".to_string()),
            refresh_ttl: Duration::days(1),
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let config = test_config();
        let pair = generate_token_pair(123, "ana@example.com", &config).unwrap();

        let claims = verify_access_token(&pair.access_token, &config).unwrap();
        assert_eq!(claims.sub, 123);
        assert_eq!(claims.email, "ana@example.com");

        let claims = verify_refresh_token(&pair.refresh_token, &config).unwrap();
        assert_eq!(claims.sub, 123);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let config = test_config();
        let pair = generate_token_pair(1, "ana@example.com", &config).unwrap();

        assert!(verify_access_token(&pair.refresh_token, &config).is_err());
        assert!(verify_refresh_token(&pair.access_token, &config).is_err());
    }

    #[test]
    fn test_expired_token() {
        let mut config = test_config();
        config.access_ttl = Duration::hours(-2);
        let pair = generate_token_pair(1, "ana@example.com", &config).unwrap();

        assert!(verify_access_token(&pair.access_token, &config).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_access_token("invalid.token.here", &test_config());
        assert!(result.is_err());
    }
}
