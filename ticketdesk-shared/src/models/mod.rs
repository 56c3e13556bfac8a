/// Database models and their repository operations
///
/// Every operation takes an explicit `&mut SqliteConnection`. Callers pass a
/// request-scoped transaction (`&mut tx`) or a pooled connection; nothing in
/// this module holds a connection of its own.
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `ticket`: Support tickets and partial updates
/// - `comment`: Immutable comments on tickets
///
/// # Example
///
/// ```no_run
/// use ticketdesk_shared::models::ticket::{CreateTicket, Ticket};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
///
/// let ticket = Ticket::create(&mut tx, CreateTicket {
///     title: "Printer jammed".to_string(),
///     description: "Kitchen printer stops after two tickets".to_string(),
///     platform: "web".to_string(),
///     username: "kitchen".to_string(),
///     restaurant_branch: "Harbour".to_string(),
/// }, user_id)
/// .await?;
///
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod comment;
pub mod ticket;
pub mod user;
