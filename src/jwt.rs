//! Access token generation and validation.
//!
//! Access tokens are signed, self-contained JWTs (HS256) carrying the subject
//! user id, issuer, and expiry. They are stateless: there is no revocation,
//! which is why their lifetime is kept short relative to refresh tokens.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Issuer claim embedded in every token this service signs.
pub const ISSUER: &str = "warbler";

/// Access token duration: 1 hour
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,
    /// Subject (user UUID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Stateless issue/validate of signed access tokens over a shared secret.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AccessTokenCodec {
    /// Create a codec with the given signing secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a signed access token for a subject, expiring after `ttl`.
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let now = unix_now()?;

        let claims = AccessClaims {
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Validate a token and return the subject user id.
    ///
    /// Checks run in order: signature, issuer, expiry. The claims of a token
    /// whose signature does not verify are never inspected, so a forged token
    /// that also happens to be expired reports `SignatureInvalid`, not
    /// `Expired`.
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is checked below so that issuer mismatch takes precedence.
        validation.validate_exp = false;

        let token_data =
            jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(
                |e| match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                    _ => TokenError::Malformed,
                },
            )?;

        let claims = token_data.claims;

        if claims.iss != ISSUER {
            return Err(TokenError::WrongIssuer);
        }

        if unix_now()? >= claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Malformed)
    }
}

/// Current Unix timestamp in seconds.
pub(crate) fn unix_now() -> Result<u64, TokenError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TokenError::TimeError)?
        .as_secs())
}

/// Errors that can occur during access token operations.
#[derive(Debug)]
pub enum TokenError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Token is not a structurally valid JWT
    Malformed,
    /// Signature does not verify under the current secret
    SignatureInvalid,
    /// Token expiry is in the past
    Expired,
    /// Token was issued by someone else
    WrongIssuer,
    /// System time error
    TimeError,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            TokenError::Malformed => write!(f, "Malformed token"),
            TokenError::SignatureInvalid => write!(f, "Invalid token signature"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::WrongIssuer => write!(f, "Unexpected token issuer"),
            TokenError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for TokenError {}
