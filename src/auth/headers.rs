//! Credential extraction from request headers.
//!
//! Two schemes share the `Authorization` header: `Bearer <token>` for
//! session-bearing endpoints and `ApiKey <key>` for the webhook receiver.
//! The shape is exact: one space, case-sensitive scheme, nothing trailing.

use axum::http::{HeaderMap, header};

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CredentialError> {
    scheme_value(headers, "Bearer")
}

/// Extract the key from an `Authorization: ApiKey <key>` header.
pub fn api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    scheme_value(headers, "ApiKey")
}

fn scheme_value<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, CredentialError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(CredentialError::MissingHeader)?
        .to_str()
        .map_err(|_| CredentialError::MalformedHeader)?;

    let (found_scheme, credential) = value
        .split_once(' ')
        .ok_or(CredentialError::MalformedHeader)?;

    if found_scheme != scheme || credential.is_empty() || credential.contains(' ') {
        return Err(CredentialError::MalformedHeader);
    }

    Ok(credential)
}

/// Errors from credential extraction.
#[derive(Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// No `Authorization` header present
    MissingHeader,
    /// Header present but not of the expected shape
    MalformedHeader,
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::MissingHeader => write!(f, "Missing Authorization header"),
            CredentialError::MalformedHeader => write!(f, "Malformed Authorization header"),
        }
    }
}

impl std::error::Error for CredentialError {}
