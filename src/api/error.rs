use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by [`crate::api::ApiClient`] after its internal recovery
/// policy (credential refresh + single retry) has run its course.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401, or a 403 whose detail points at missing/invalid session
    /// credentials. The global logged-out transition has already fired by
    /// the time this reaches a caller.
    #[error("unauthorized: {detail}")]
    Unauthorized { detail: String },

    /// A CSRF-classified 403 that survived the one permitted retry.
    #[error("rejected by CSRF protection: {detail}")]
    CsrfRejected { detail: String },

    /// Any other 4xx, passed through verbatim.
    #[error("request rejected ({status}): {detail}")]
    Validation { status: StatusCode, detail: String },

    #[error("server error ({status}): {detail}")]
    Server { status: StatusCode, detail: String },

    /// A 2xx body that did not decode into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// What a 403 from this backend actually means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ForbiddenKind {
    /// Stale or missing CSRF token; recoverable with a refreshed credential.
    CsrfMismatch,
    /// The session itself is gone; only a new login helps.
    SessionInvalid,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Classify a 403 by its human-readable detail string.
///
/// The backend does not expose a structured error code, so this preserves
/// the observed message shapes: CSRF rejections mention "CSRF"
/// ("CSRF Failed: CSRF token missing or incorrect."), session problems
/// mention "credentials" ("Authentication credentials were not provided.").
/// Anything that names neither is treated as a CSRF problem, since that is
/// the recoverable reading.
// TODO: switch to a structured error code once the backend exposes one;
// substring matching on translatable prose is fragile.
pub(crate) fn classify_forbidden(detail: &str) -> ForbiddenKind {
    if detail.contains("CSRF") || !detail.contains("credentials") {
        ForbiddenKind::CsrfMismatch
    } else {
        ForbiddenKind::SessionInvalid
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        match body.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
            None => body.to_string(),
            Some((cut, _)) => format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            ),
        }
    }

    /// Pull the server-provided message out of an error body, which this
    /// backend sends as `{"detail": ...}` or `{"error": ...}`.
    fn extract_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("detail")
            .or_else(|| value.get("error"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail =
            Self::extract_message(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized { detail },
            403 => match classify_forbidden(&detail) {
                ForbiddenKind::SessionInvalid => ApiError::Unauthorized { detail },
                ForbiddenKind::CsrfMismatch => ApiError::CsrfRejected { detail },
            },
            500..=599 => ApiError::Server { status, detail },
            _ => ApiError::Validation { status, detail },
        }
    }

    /// The server-provided message, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::CsrfRejected { detail }
            | ApiError::Validation { detail, .. }
            | ApiError::Server { detail, .. } => Some(detail),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// True for the error classes that force the logged-out transition.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
