//! REST API for users and the courses they own.
//!
//! Mutating routes are protected by HTTP Basic credentials checked against
//! the stored Argon2 hash, record-level mutations are limited to the record's
//! owner, and every failure is rendered through [`error::ApiError`].

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
pub mod testing;

pub use app::{app, router, AppState};
