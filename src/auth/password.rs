use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Hash a secret with a fresh random salt, producing a PHC string.
pub fn hash_secret(secret: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

/// Verify a secret against a stored PHC hash. The final digest comparison
/// inside argon2 is constant-time. An unparsable stored hash never matches.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// Verified against when the claimed identity does not exist, so an unknown
// email costs the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_secret("not-a-real-password").ok());

/// [`hash_secret`] on tokio's blocking pool.
pub async fn spawn_hash(secret: String) -> Result<String, HashError> {
    tokio::task::spawn_blocking(move || hash_secret(&secret))
        .await
        .map_err(|e| HashError(e.to_string()))?
}

/// [`verify_secret`] on tokio's blocking pool. `Err` only when the task
/// itself failed, never for a wrong secret.
pub async fn spawn_verify(secret: String, stored_hash: String) -> Result<bool, HashError> {
    tokio::task::spawn_blocking(move || verify_secret(&secret, &stored_hash))
        .await
        .map_err(|e| HashError(e.to_string()))
}

pub async fn burn_verification(secret: String) {
    let burned = tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = verify_secret(&secret, hash);
        }
    })
    .await;
    if let Err(e) = burned {
        tracing::warn!("dummy verification did not finish: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip_accepts_only_the_original_secret() {
        let hash = hash_secret("correct horse").unwrap();
        assert!(verify_secret("correct horse", &hash));
        assert!(!verify_secret("Correct horse", &hash));
        assert!(!verify_secret("", &hash));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let a = hash_secret("secret").unwrap();
        let b = hash_secret("secret").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn spawned_hash_and_verify_agree_with_inline_versions() {
        let hash = spawn_hash("correct horse".to_string()).await.unwrap();
        assert!(verify_secret("correct horse", &hash));
        assert!(spawn_verify("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!spawn_verify("wrong horse".to_string(), hash).await.unwrap());

        // Unknown identities still pay for a verification and never panic.
        burn_verification("anything".to_string()).await;
    }

    #[test]
    fn plaintext_stored_value_never_matches() {
        assert!(!verify_secret("secret", "secret"));
    }
}
