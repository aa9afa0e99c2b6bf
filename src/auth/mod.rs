//! Session management: who is logged in, and how that changes.
//!
//! This module provides:
//! - `SessionState` / `SessionHandle`: observable authenticated/bootstrapping
//!   flags shared by the HTTP client and the embedding application
//! - `SessionManager`: the startup session check, login, and logout
//! - `MarkerStore`: the on-disk "previously logged in" hint
//!
//! The session cookie itself lives in the HTTP client's cookie jar; nothing
//! here stores credentials.

pub mod manager;
pub mod marker;
pub mod state;

pub use manager::{LoginOutcome, SessionManager};
pub use marker::MarkerStore;
pub use state::{SessionHandle, SessionState};
