/// User model and database operations
///
/// Users are created once at registration and never deleted. The password
/// hash is write-once and is skipped during serialization, so a `User` can
/// never leak it through a response body or log line built with serde.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(100) NOT NULL UNIQUE,
///     hashed_password VARCHAR(200) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use ticketdesk_shared::models::user::{User, CreateUser};
/// use ticketdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let mut tx = pool.begin().await?;
///
/// let user = User::create(&mut tx, CreateUser {
///     username: "jane".to_string(),
///     email: "jane@example.com".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// })
/// .await?;
///
/// let found = User::find_by_email(&mut tx, "jane@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
///
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::SqliteConnection;

/// User account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Generated user ID
    pub id: i64,

    /// Login name, unique across all users
    pub username: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Inactive users cannot authenticate with a token
    pub is_active: bool,

    /// Stored and reported, gates nothing
    pub is_admin: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub hashed_password: String,
}

const USER_COLUMNS: &str = "id, username, email, hashed_password, is_active, is_admin";

impl User {
    /// Inserts a new active, non-admin user
    ///
    /// # Errors
    ///
    /// Returns a database error on a duplicate username or email (unique
    /// constraint) or when the connection fails.
    pub async fn create(conn: &mut SqliteConnection, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, hashed_password, is_active, is_admin)
            VALUES (?, ?, ?, TRUE, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.hashed_password)
        .fetch_one(conn)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Finds a user by email address
    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(conn)
            .await
    }

    /// Finds a user by username
    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
            .bind(username)
            .fetch_optional(conn)
            .await
    }

    /// Finds the account a login name refers to
    ///
    /// The login form's `username` field may carry either the username or
    /// the email address. Username wins when both could match.
    pub async fn find_by_login(
        conn: &mut SqliteConnection,
        login: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        if let Some(user) = Self::find_by_username(&mut *conn, login).await? {
            return Ok(Some(user));
        }

        Self::find_by_email(conn, login).await
    }

    /// Lists users in ID order
    pub async fn list(conn: &mut SqliteConnection, skip: i64, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(conn)
        .await
    }
}
