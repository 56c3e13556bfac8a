//! # TicketDesk Shared Library
//!
//! Types, persistence and authentication shared by the TicketDesk API
//! server and its tests.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, bearer tokens, request authentication
//! - `db`: Connection pool and migrations
//! - `models`: Users, tickets, comments and their repository operations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TicketDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
