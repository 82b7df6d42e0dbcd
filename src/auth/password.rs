//! Password hashing and verification.
//!
//! bcrypt generates a fresh salt per call and embeds it in the output, so
//! verification needs nothing beyond the stored hash. The work happens on the
//! blocking thread pool; at the default cost a hash takes long enough to
//! stall an async worker otherwise.

use bcrypt::DEFAULT_COST;

/// Hash a password with a per-call random salt.
///
/// Input shape is never a failure: empty passwords hash fine. The server does
/// not enforce a password policy.
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, DEFAULT_COST).map_err(PasswordError::Hashing)
    })
    .await
    .map_err(|_| PasswordError::TaskJoin)?
}

/// Verify a candidate password against a stored hash.
///
/// Returns `Ok(false)` for a mismatch. An error means the stored hash itself
/// is corrupt, not that the password was wrong. The comparison inside bcrypt
/// is constant-time.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(PasswordError::Hashing)
    })
    .await
    .map_err(|_| PasswordError::TaskJoin)?
}

/// Errors that can occur while hashing or verifying passwords.
#[derive(Debug)]
pub enum PasswordError {
    /// bcrypt failed (corrupt stored hash, or entropy/resource failure)
    Hashing(bcrypt::BcryptError),
    /// The blocking task was cancelled or panicked
    TaskJoin,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Hashing(e) => write!(f, "Password hashing failed: {}", e),
            PasswordError::TaskJoin => write!(f, "Password hashing task failed"),
        }
    }
}

impl std::error::Error for PasswordError {}
