/// Database layer for TicketDesk
///
/// # Modules
///
/// - `pool`: SQLite connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// Models and their queries are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
