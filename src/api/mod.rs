//! HTTP client module for the hour-tracking backend.
//!
//! This module provides the `ApiClient` for talking to the backend's REST
//! API: employee and project CRUD, hour logging, statistics, and report
//! export.
//!
//! The backend uses cookie-session authentication with double-submit CSRF
//! protection; `client` owns that protocol, `resources` adds the typed
//! per-endpoint accessors on top of it.

pub mod client;
pub mod error;
pub mod resources;

pub use client::ApiClient;
pub use error::ApiError;
