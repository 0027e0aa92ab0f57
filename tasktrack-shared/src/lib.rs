//! # TaskTrack Shared Library
//!
//! This crate contains the authentication primitives and data-access layer used
//! by the TaskTrack API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, token issuance/validation, revocation, request gate
//! - `db`: Connection pool and embedded migrations
//! - `models`: Companies, users, and ownership-scoped tasks

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
