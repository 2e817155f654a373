use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;

#[cfg(not(test))]
const ITERATIONS: u32 = 260_000;
#[cfg(test)]
const ITERATIONS: u32 = 1_000;

const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hashes a password as `pbkdf2:sha256:iterations$salt$hash`
/// (PBKDF2-HMAC-SHA256, 16 byte random salt, URL-safe base64 without padding)
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ITERATIONS, &mut key);

    format!(
        "pbkdf2:sha256:{}${}${}",
        ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    )
}

/// Checks a password against a stored hash.
/// A malformed stored hash is an error, a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // pbkdf2:sha256:iterations$salt$hash
    let mut parts = stored_hash.split('$');
    let (Some(header), Some(salt_str), Some(hash_str), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("Invalid hash format".to_string());
    };

    let iterations = match header.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", iterations] => iterations
            .parse::<u32>()
            .map_err(|_| "Invalid iterations".to_string())?,
        _ => return Err("Invalid header".to_string()),
    };

    let salt = URL_SAFE_NO_PAD
        .decode(salt_str)
        .map_err(|e| format!("Invalid salt: {}", e))?;
    let expected = URL_SAFE_NO_PAD
        .decode(hash_str)
        .map_err(|e| format!("Invalid hash: {}", e))?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut computed);

    Ok(constant_time_eq(&computed, &expected))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret!");

        assert!(hash.starts_with("pbkdf2:sha256:"));
        assert!(verify_password("s3cret!", &hash).unwrap());
        assert!(!verify_password("s3cret?", &hash).unwrap());
    }

    #[test]
    fn test_salt_is_random() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
        assert!(verify_password("x", "bcrypt:10$abc$def").is_err());
        assert!(verify_password("x", "pbkdf2:sha256:many$abc$def").is_err());
    }
}
