/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Token issuance (login)
/// - `users`: Registration and the current user
/// - `tickets`: Ticket CRUD
/// - `comments`: Ticket comments

pub mod auth;
pub mod comments;
pub mod health;
pub mod tickets;
pub mod users;
