//! Client library for the Hourbook work-hour tracking backend.
//!
//! The backend authenticates with a session cookie and double-submit CSRF
//! protection. This crate hides that protocol behind a typed API:
//!
//! - `api`: the HTTP client, its error taxonomy, and per-endpoint accessors
//! - `auth`: observable session state, the startup check, login and logout
//! - `models`: employees, projects, hour entries, statistics
//! - `nav`: the seam through which session loss sends the user to login
//!
//! Wiring order matters only in that the client and the manager share one
//! [`SessionHandle`]:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hourbook_client::{
//!     ApiClient, Config, InProcessNavigator, MarkerStore, SessionHandle, SessionManager,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let session = SessionHandle::new(
//!     MarkerStore::new(config.state_dir.clone()),
//!     Arc::new(InProcessNavigator::new()),
//! );
//! let client = ApiClient::new(config, session.clone())?;
//! let manager = SessionManager::new(client.clone(), session.clone());
//!
//! manager.bootstrap().await;
//! if session.is_authenticated() {
//!     let employees = client.fetch_employees().await?;
//!     println!("{} employees", employees.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{LoginOutcome, MarkerStore, SessionHandle, SessionManager, SessionState};
pub use config::Config;
pub use nav::{InProcessNavigator, Navigator, LOGIN_PATH};
