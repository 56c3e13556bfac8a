//! # TicketDesk API Server Library
//!
//! HTTP surface of the TicketDesk ticket tracker.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and authentication middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
