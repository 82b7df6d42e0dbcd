//! Request authentication extractor.
//!
//! `Auth` pulls the bearer access token out of the `Authorization` header
//! and validates it, yielding the subject user id. Ownership decisions stay
//! with the handlers; this only answers "who is calling".

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::headers::{CredentialError, bearer_token};
use crate::jwt::{AccessTokenCodec, TokenError};

/// Trait for state types that can authenticate requests.
pub trait HasAuthState {
    fn codec(&self) -> &AccessTokenCodec;
}

/// Extractor for endpoints that require a valid access token.
pub struct Auth(pub Uuid);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(AuthRejection::Credential)?;
        let subject = state.codec().validate(token).map_err(AuthRejection::Token)?;
        Ok(Auth(subject))
    }
}

/// Authentication rejection. Every variant maps to 401; the body does not
/// reveal whether a presented token was forged or merely expired.
#[derive(Debug)]
pub enum AuthRejection {
    Credential(CredentialError),
    Token(TokenError),
}

impl AuthRejection {
    fn message(&self) -> &'static str {
        match self {
            AuthRejection::Credential(_) => "Not authenticated",
            AuthRejection::Token(_) => "Invalid or expired token",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
