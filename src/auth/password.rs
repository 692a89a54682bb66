//! Admin password hashing. Hashes are written to `users.password_hash` when
//! the first-run seed creates the admin account and checked on every login.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

fn argon2_failure(step: &'static str, e: password_hash::Error) -> anyhow::Error {
    error!(error = %e, step, "argon2 failure");
    anyhow::anyhow!("argon2 {step}: {e}")
}

/// PHC string for the seeded admin account (Argon2id, fresh salt per call).
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| argon2_failure("hash", e))?;
    Ok(phc.to_string())
}

/// Checks a login attempt against the stored PHC string.
///
/// A wrong password is `Ok(false)`. `Err` means the stored value is not a
/// PHC string at all; the login handler rejects that the same way.
pub fn verify_password(attempt: &str, stored: &str) -> anyhow::Result<bool> {
    let stored = PasswordHash::new(stored).map_err(|e| argon2_failure("parse stored hash", e))?;
    Ok(Argon2::default()
        .verify_password(attempt.as_bytes(), &stored)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("admin123").expect("hashing should succeed");
        assert!(verify_password("admin123", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("admin123").expect("hashing should succeed");
        assert!(!verify_password("admin1234", &hash).expect("verify should not error"));
        assert!(!verify_password("", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().starts_with("argon2 parse stored hash"));
    }

    #[test]
    fn seeded_default_verifies_against_test_config() {
        let seed = crate::config::AppConfig::for_tests().seed;
        let hash = hash_password(&seed.admin_password).unwrap();
        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("Admin123", &hash).unwrap());
    }
}
