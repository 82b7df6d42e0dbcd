//! Authentication & session-token core.
//!
//! Dual-token scheme: short-lived signed access tokens (1 hour, stateless)
//! and long-lived opaque refresh tokens (60 days, database-tracked with a
//! revocation flag). Passwords are bcrypt-hashed; credentials arrive in the
//! `Authorization` header as `Bearer <token>` or `ApiKey <key>`.

mod extract;
mod headers;
mod password;
mod refresh;
mod session;

pub use extract::{Auth, AuthRejection, HasAuthState};
pub use headers::{CredentialError, api_key, bearer_token};
pub use password::{PasswordError, hash_password, verify_password};
pub use refresh::{REFRESH_TOKEN_LEN, REFRESH_TOKEN_TTL, generate_refresh_token};
pub use session::{LoginSession, SessionError, SessionService};
