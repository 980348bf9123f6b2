use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

use crate::config::PasswordPolicy;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Check a candidate password against the configured policy. Returns the
/// reason for rejection, suitable for the client.
pub fn check_strength(policy: &PasswordPolicy, plain: &str) -> Result<(), String> {
    lazy_static! {
        static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
        static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
    }
    if plain.chars().count() < policy.min_length {
        return Err(format!(
            "Password must be at least {} characters",
            policy.min_length
        ));
    }
    if policy.require_letter && !HAS_LETTER.is_match(plain) {
        return Err("Password must contain a letter".into());
    }
    if policy.require_digit && !HAS_DIGIT.is_match(plain) {
        return Err("Password must contain a digit".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy {
            min_length: 8,
            require_letter: true,
            require_digit: true,
        }
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn strength_rejects_short_password() {
        let err = check_strength(&policy(), "a1b2c3").unwrap_err();
        assert!(err.contains("at least 8"));
    }

    #[test]
    fn strength_rejects_missing_digit() {
        let err = check_strength(&policy(), "onlyletters").unwrap_err();
        assert!(err.contains("digit"));
    }

    #[test]
    fn strength_rejects_missing_letter() {
        let err = check_strength(&policy(), "1234567890").unwrap_err();
        assert!(err.contains("letter"));
    }

    #[test]
    fn strength_accepts_policy_conforming_password() {
        assert!(check_strength(&policy(), "secret123!").is_ok());
    }

    #[test]
    fn strength_thresholds_come_from_the_policy() {
        let relaxed = PasswordPolicy {
            min_length: 4,
            require_letter: false,
            require_digit: false,
        };
        assert!(check_strength(&relaxed, "ab12").is_ok());
    }
}
