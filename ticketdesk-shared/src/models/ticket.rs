/// Ticket model and database operations
///
/// A ticket is owned by the user who created it (`user_id`). The `username`
/// column is the free-text name of whoever reported the issue and has no
/// relation to the owning account.
///
/// Updates are partial: a [`TicketPatch`] names exactly the fields to change,
/// and `updated_at` is refreshed on every update regardless.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tickets (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     platform VARCHAR(100) NOT NULL,
///     username VARCHAR(100) NOT NULL,
///     restaurant_branch VARCHAR(100) NOT NULL,
///     status VARCHAR(20) NOT NULL DEFAULT 'unassigned',
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     created_at TIMESTAMP NOT NULL,
///     updated_at TIMESTAMP NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

/// Status assigned to every new ticket
pub const DEFAULT_STATUS: &str = "unassigned";

/// Support ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub platform: String,

    /// Free-text name of the person who reported the issue
    pub username: String,

    pub restaurant_branch: String,

    /// Free-form workflow status, "unassigned" on creation
    pub status: String,

    /// Account that created the ticket
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new ticket
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub platform: String,
    pub username: String,
    pub restaurant_branch: String,
}

/// Partial update for a ticket
///
/// `None` leaves the field untouched. `Some(value)` overwrites it, including
/// `Some(String::new())` which clears it to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub username: Option<String>,
    pub restaurant_branch: Option<String>,
    pub status: Option<String>,
}

impl TicketPatch {
    /// True when the patch changes no field
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.platform.is_none()
            && self.username.is_none()
            && self.restaurant_branch.is_none()
            && self.status.is_none()
    }

    /// Merges the patch into `ticket` and stamps `updated_at`
    pub fn apply(self, ticket: &mut Ticket, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(description) = self.description {
            ticket.description = description;
        }
        if let Some(platform) = self.platform {
            ticket.platform = platform;
        }
        if let Some(username) = self.username {
            ticket.username = username;
        }
        if let Some(restaurant_branch) = self.restaurant_branch {
            ticket.restaurant_branch = restaurant_branch;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }

        ticket.updated_at = now;
    }
}

const TICKET_COLUMNS: &str = "id, title, description, platform, username, restaurant_branch, \
                              status, user_id, created_at, updated_at";

impl Ticket {
    /// Inserts a ticket owned by `user_id` with status "unassigned"
    pub async fn create(
        conn: &mut SqliteConnection,
        data: CreateTicket,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (title, description, platform, username, restaurant_branch,
                                 status, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.platform)
        .bind(data.username)
        .bind(data.restaurant_branch)
        .bind(DEFAULT_STATUS)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    /// Finds a ticket by ID
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Checks whether a ticket with this ID exists
    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let (matches,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_one(conn)
            .await?;

        Ok(matches > 0)
    }

    /// Lists tickets in ID (insertion) order
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ticketdesk_shared::models::ticket::Ticket;
    /// # use sqlx::SqlitePool;
    /// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
    /// let mut conn = pool.acquire().await?;
    ///
    /// let first_page = Ticket::list(&mut conn, 0, 10).await?;
    /// let second_page = Ticket::list(&mut conn, 10, 10).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(conn: &mut SqliteConnection, skip: i64, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY id ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(conn)
        .await
    }

    /// Applies a partial update
    ///
    /// Reads the current row, merges `patch` into it and writes it back on
    /// the same connection, so callers running inside a transaction get an
    /// atomic read-modify-write.
    ///
    /// # Returns
    ///
    /// The updated ticket, or `None` if no ticket has this ID
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        patch: TicketPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(mut ticket) = Self::find_by_id(&mut *conn, id).await? else {
            return Ok(None);
        };

        patch.apply(&mut ticket, Utc::now());

        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET title = ?, description = ?, platform = ?, username = ?,
                restaurant_branch = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket.title)
        .bind(ticket.description)
        .bind(ticket.platform)
        .bind(ticket.username)
        .bind(ticket.restaurant_branch)
        .bind(ticket.status)
        .bind(ticket.updated_at)
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Deletes a ticket and its comments
    ///
    /// # Returns
    ///
    /// The ticket as it was before deletion, or `None` if it did not exist.
    /// Deleting an absent ID is not an error.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(&format!(
            "DELETE FROM tickets WHERE id = ? RETURNING {TICKET_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }
}
