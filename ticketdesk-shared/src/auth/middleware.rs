/// Bearer token authentication for Axum
///
/// Each protected request runs through the same steps:
///
/// ```text
/// NoToken ──(Authorization: Bearer …)──▶ TokenPresent ──verify──▶ subject
///    │                                        │                      │
///    ▼                                        ▼                      ▼
/// Rejected(MissingCredentials)     Rejected(InvalidToken)   find user by id
///                                                      ├─ missing  → Rejected(UnknownUser)
///                                                      ├─ inactive → Rejected(InactiveUser)
///                                                      └─ active   → Verified(user)
/// ```
///
/// Every rejection produces the same 401 response with
/// `WWW-Authenticate: Bearer`; the reason is logged, never returned. Only a
/// storage failure while resolving the user is reported differently (500).
///
/// After verification the user is stored in request extensions as
/// [`CurrentUser`].
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use ticketdesk_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::SqliteConnection;
use tracing::{debug, error};

use super::jwt::{JwtError, TokenService};
use crate::models::user::User;

/// Message returned for every authentication rejection
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

/// Authenticated user attached to the request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reasons a request fails authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header
    #[error("Missing bearer token")]
    MissingCredentials,

    /// Signature, structure, issuer or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token subject does not exist
    #[error("Token subject {0} does not exist")]
    UnknownUser(i64),

    /// Token subject is deactivated
    #[error("User {0} is inactive")]
    InactiveUser(i64),

    /// Storage failed while resolving the user
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// True for every outcome that maps to 401
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Database(_))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Database(e) = &self {
            error!("Database error during authentication: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        debug!(reason = %self, "Rejected request authentication");
        let mut response = (StatusCode::UNAUTHORIZED, UNAUTHENTICATED_MESSAGE).into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is absent, not valid UTF-8, uses another scheme or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves a bearer token to an active user
///
/// `conn` is only used for the user lookup; the caller owns and releases it.
pub async fn authenticate(
    conn: &mut SqliteConnection,
    tokens: &TokenService,
    token: Option<&str>,
) -> Result<User, AuthError> {
    let token = token.ok_or(AuthError::MissingCredentials)?;

    let user_id = tokens.verify(token)?;

    let user = User::find_by_id(conn, user_id)
        .await?
        .ok_or(AuthError::UnknownUser(user_id))?;

    if !user.is_active {
        return Err(AuthError::InactiveUser(user_id));
    }

    Ok(user)
}
