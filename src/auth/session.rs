//! Login, refresh, and revoke orchestration.
//!
//! Composes the password hasher, access token codec, and refresh token store.
//! Holds no state of its own beyond handles to those collaborators.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{PasswordError, verify_password};
use crate::auth::refresh::{REFRESH_TOKEN_TTL, generate_refresh_token};
use crate::db::{Database, User};
use crate::jwt::{ACCESS_TOKEN_TTL, AccessTokenCodec, TokenError, unix_now};

/// A successful login: the authenticated user plus a fresh token pair.
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionService {
    db: Database,
    codec: Arc<AccessTokenCodec>,
}

impl SessionService {
    pub fn new(db: Database, codec: Arc<AccessTokenCodec>) -> Self {
        Self { db, codec }
    }

    /// Authenticate by email and password, issuing an access token (1 hour)
    /// and a stored refresh token (60 days).
    ///
    /// An unknown email and a wrong password both surface as
    /// `InvalidCredentials`; callers must not be able to tell them apart.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, SessionError> {
        let user = self
            .db
            .users()
            .get_by_email(email)
            .await
            .map_err(SessionError::Store)?
            .ok_or(SessionError::InvalidCredentials)?;

        let matches = verify_password(password, &user.password_hash)
            .await
            .map_err(SessionError::Password)?;
        if !matches {
            return Err(SessionError::InvalidCredentials);
        }

        let subject = parse_subject(&user.uuid)?;
        let access_token = self
            .codec
            .issue(subject, ACCESS_TOKEN_TTL)
            .map_err(SessionError::Token)?;

        let refresh_token = generate_refresh_token();
        let now = unix_now().map_err(SessionError::Token)? as i64;
        self.db
            .tokens()
            .insert(
                &refresh_token,
                user.id,
                now,
                now + REFRESH_TOKEN_TTL.as_secs() as i64,
            )
            .await
            .map_err(SessionError::Store)?;

        Ok(LoginSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated: its row is never touched
    /// here, and it stays usable until its own expiry or an explicit revoke.
    /// Unknown, expired, and revoked tokens all fail identically.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError> {
        let now = unix_now().map_err(SessionError::Token)? as i64;

        let record = self
            .db
            .tokens()
            .lookup(refresh_token)
            .await
            .map_err(SessionError::Store)?
            .ok_or(SessionError::InvalidRefreshToken)?;

        if record.revoked_at.is_some() || now >= record.expires_at {
            return Err(SessionError::InvalidRefreshToken);
        }

        let user = self
            .db
            .users()
            .get_by_id(record.user_id)
            .await
            .map_err(SessionError::Store)?
            .ok_or(SessionError::InvalidRefreshToken)?;

        let subject = parse_subject(&user.uuid)?;
        self.codec
            .issue(subject, ACCESS_TOKEN_TTL)
            .map_err(SessionError::Token)
    }

    /// Revoke a refresh token. Succeeds uniformly whether the token was
    /// live, already revoked, or never existed; only a store failure is an
    /// error.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), SessionError> {
        let now = unix_now().map_err(SessionError::Token)? as i64;
        self.db
            .tokens()
            .revoke(refresh_token, now)
            .await
            .map_err(SessionError::Store)
    }
}

fn parse_subject(uuid: &str) -> Result<Uuid, SessionError> {
    Uuid::parse_str(uuid).map_err(|_| SessionError::CorruptRecord)
}

/// Errors from session orchestration.
#[derive(Debug)]
pub enum SessionError {
    /// Unknown email or wrong password (indistinguishable by design)
    InvalidCredentials,
    /// Refresh token unknown, expired, or revoked (indistinguishable by design)
    InvalidRefreshToken,
    /// Password hashing/verification failed
    Password(PasswordError),
    /// Access token issuance failed
    Token(TokenError),
    /// Store call failed
    Store(sqlx::Error),
    /// A stored record is internally inconsistent
    CorruptRecord,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidCredentials => write!(f, "Incorrect email or password"),
            SessionError::InvalidRefreshToken => write!(f, "Invalid or expired refresh token"),
            SessionError::Password(e) => write!(f, "Password verification failed: {}", e),
            SessionError::Token(e) => write!(f, "Token issuance failed: {}", e),
            SessionError::Store(e) => write!(f, "Store failure: {}", e),
            SessionError::CorruptRecord => write!(f, "Corrupt stored record"),
        }
    }
}

impl std::error::Error for SessionError {}
