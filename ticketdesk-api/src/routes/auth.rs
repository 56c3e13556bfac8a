/// Token issuance
///
/// # Endpoints
///
/// - `POST /token` - Exchange username (or email) and password for a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use ticketdesk_shared::{auth::password, models::user::User};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// Login form
///
/// Field names follow the OAuth2 password grant; `username` may also hold
/// the account's email address.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Log in and get an access token
///
/// # Endpoint
///
/// ```text
/// POST /token
/// Content-Type: application/x-www-form-urlencoded
///
/// username=alice&password=secret
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown account, wrong password or inactive account
pub async fn login(
    State(state): State<AppState>,
    Form(req): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = {
        let mut conn = state.db.acquire().await?;
        User::find_by_login(&mut conn, &req.username).await?
    };

    let Some(user) = user else {
        let plaintext = req.password;
        tokio::task::spawn_blocking(move || password::verify_dummy(&plaintext)).await?;

        warn!(login = %req.username, "Login failed: unknown account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let hash = user.hashed_password.clone();
    let plaintext = req.password;
    let valid =
        tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash)).await?;

    if !valid {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if !user.is_active {
        warn!(user_id = user.id, "Login failed: account inactive");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = state.tokens.issue(user.id)?;

    info!(user_id = user.id, "Issued access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
