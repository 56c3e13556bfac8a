/// User endpoints
///
/// # Endpoints
///
/// - `POST /users/` - Register a new account
/// - `GET /users/me/` - The authenticated account

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use ticketdesk_shared::{
    auth::{middleware::CurrentUser, password},
    db::pool,
    models::user::{CreateUser, User},
};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1 to 50 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Public view of a user; the password hash has no field here
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            is_admin: user.is_admin,
        }
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /users/
/// Content-Type: application/json
///
/// {"username": "alice", "email": "alice@example.com", "password": "secret"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email (or username) already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let existing = {
        let mut conn = state.db.acquire().await?;
        User::find_by_email(&mut conn, &req.email).await?
    };
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let plaintext = req.password;
    let hashed_password =
        tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await??;

    // A concurrent registration can still win the race; the UNIQUE
    // constraint turns that into a Conflict.
    let mut tx = pool::begin_write(&state.db).await?;
    let user = User::create(
        &mut tx,
        CreateUser {
            username: req.username,
            email: req.email,
            hashed_password,
        },
    )
    .await?;
    tx.commit().await?;

    info!(user_id = user.id, username = %user.username, "Registered user");

    Ok(Json(user.into()))
}

/// Returns the authenticated user
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}
