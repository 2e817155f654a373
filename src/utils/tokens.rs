use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;
pub const PASSWORD_RESET_TTL_HOURS: i64 = 1;

/// Single-use token for email verification and password reset links
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Expiry timestamp `hours` from now, in the naive UTC form stored by the database
pub fn expires_in(hours: i64) -> NaiveDateTime {
    (Utc::now() + Duration::hours(hours)).naive_utc()
}
