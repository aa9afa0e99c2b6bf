//! Navigation seam.
//!
//! The session layer reacts to expired sessions by sending the user to the
//! login screen. What "sending" means depends on the embedder (swap a view,
//! print a prompt, push a route), so the client only talks to this trait.

use std::sync::Mutex;

/// Route of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// Where the user currently is, and how to move them.
///
/// Implementations must be cheap to call: `navigate` fires on every
/// authentication failure and must not block the request path.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Default [`Navigator`] that just records the current route in memory.
///
/// Useful for headless embedders and tests; UI hosts provide their own.
#[derive(Debug)]
pub struct InProcessNavigator {
    path: Mutex<String>,
}

impl InProcessNavigator {
    pub fn new() -> Self {
        Self {
            path: Mutex::new("/".to_string()),
        }
    }

    fn with_path<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        match self.path.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl Default for InProcessNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for InProcessNavigator {
    fn current_path(&self) -> String {
        self.with_path(|p| p.clone())
    }

    fn navigate(&self, path: &str) {
        tracing::debug!("Navigating to {}", path);
        self.with_path(|p| *p = path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_root() {
        let nav = InProcessNavigator::new();
        assert_eq!(nav.current_path(), "/");
    }

    #[test]
    fn test_navigate_updates_current_path() {
        let nav = InProcessNavigator::new();
        nav.navigate(LOGIN_PATH);
        assert_eq!(nav.current_path(), LOGIN_PATH);
    }
}
