//! Opaque refresh token generation.
//!
//! Refresh tokens carry no embedded structure: 32 bytes from a CSPRNG,
//! hex-encoded. Their state (owner, expiry, revocation) lives in the
//! database; see [`crate::db::RefreshTokenStore`].

use rand::RngCore;
use std::time::Duration;

/// Refresh token duration: 60 days
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// Length of a refresh token string: 32 bytes, hex-encoded.
pub const REFRESH_TOKEN_LEN: usize = 64;

/// Generate a fresh opaque refresh token (64 lowercase hex characters).
///
/// Collisions across 256 bits of entropy are treated as negligible; there is
/// no retry on insert conflicts.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
