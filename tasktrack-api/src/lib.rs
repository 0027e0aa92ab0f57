//! # TaskTrack API Server Library
//!
//! HTTP surface for the multi-tenant task tracker: registration and login,
//! bearer-protected user, company, and task endpoints.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers
//! - `uploads`: Profile picture storage

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod uploads;
