/// Comment model and database operations
///
/// Comments are immutable once written: there is no update or delete. They
/// are removed only when their ticket is deleted (`ON DELETE CASCADE`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     text TEXT NOT NULL,
///     ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     created_at TIMESTAMP NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

/// Comment on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub ticket_id: i64,

    /// Author
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Adds a comment by `user_id` to `ticket_id`
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the ticket does not exist. The API
    /// checks existence first so this only surfaces on a concurrent delete.
    pub async fn create(
        conn: &mut SqliteConnection,
        text: String,
        ticket_id: i64,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (text, ticket_id, user_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, text, ticket_id, user_id, created_at
            "#,
        )
        .bind(text)
        .bind(ticket_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    /// Lists the comments of a ticket in creation order
    pub async fn list_by_ticket(
        conn: &mut SqliteConnection,
        ticket_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, text, ticket_id, user_id, created_at
            FROM comments
            WHERE ticket_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(conn)
        .await
    }
}
