//! Argon2 password hashing.
//!
//! The account store treats hashes as opaque strings; these helpers are the
//! hash function callers supply before an account is created.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Hash a plain text password into a PHC string.
///
/// # Errors
/// Returns a validation error if the password is shorter than
/// [`MIN_PASSWORD_LENGTH`].
pub fn hash_password(plain_text: &str) -> DomainResult<String> {
    if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| DomainError::password(format!("hash failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plain text password against a stored PHC string.
pub fn verify_password(plain_text: &str, hash: &str) -> DomainResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| DomainError::password(format!("invalid hash format: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(plain_text.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("SecurePassword123!").unwrap();

        assert!(verify_password("SecurePassword123!", &hash).unwrap());
        assert!(!verify_password("WrongPassword123", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("SamePassword123").unwrap();
        let second = hash_password("SamePassword123").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(
            hash_password("short"),
            Err(DomainError::Validation(_))
        ));
        // Exactly 8 characters should work
        assert!(hash_password("12345678").is_ok());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-valid-hash"),
            Err(DomainError::Password(_))
        ));
    }
}
