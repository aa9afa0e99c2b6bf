//! HTTP client for the hour-tracking backend.
//!
//! The backend authenticates with a session cookie and protects
//! state-changing requests with a double-submit token: the server sets a
//! `csrftoken` cookie, and every `POST`/`PUT`/`PATCH`/`DELETE` must echo
//! that value back in the `X-CSRFToken` header. This module owns that
//! protocol end to end: reading the cookie, acquiring it when absent
//! (once, no matter how many requests need it at the same time), retrying
//! a request the server rejected over a stale token, and flipping the
//! shared session state to logged-out when the session itself is gone.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionHandle;
use crate::config::Config;
use crate::utils::SingleFlight;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Cookie the backend stores its anti-forgery token in
const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend compares against that cookie on state-changing requests
const CSRF_HEADER: &str = "X-CSRFToken";

/// API path that issues the anti-forgery cookie.
/// A plain GET here makes the backend set the cookie, and the response body
/// carries the token as `csrf_token` as well.
const CSRF_ISSUE_PATH: &str = "/login/";

/// Maximum retries after a CSRF-classified 403.
/// One retry with a freshly issued token recovers a rotated cookie; a second
/// rejection means the problem is not the token.
const MAX_CSRF_RETRIES: u32 = 1;

#[derive(Debug, Deserialize)]
struct CsrfIssueBody {
    csrf_token: Option<String>,
}

/// API client for the hour-tracking backend.
/// Clone is cheap - reqwest::Client uses Arc internally, and clones share
/// the cookie jar and the in-flight credential slot.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    config: Config,
    session: SessionHandle,
    credential: SingleFlight<Option<String>>,
}

impl ApiClient {
    /// Create a new API client bound to the shared session state.
    pub fn new(config: Config, session: SessionHandle) -> anyhow::Result<Self> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .timeout(config.request_timeout)
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self {
            http,
            jar,
            config,
            session,
            credential: SingleFlight::new(),
        })
    }

    // ========================================================================
    // Credential handling
    // ========================================================================

    /// Current anti-forgery token: the cookie if the backend already set
    /// one, otherwise the result of acquiring it.
    ///
    /// Concurrent callers that find the cookie missing share a single
    /// acquisition; none of them triggers a second one. Returns `None` when
    /// the token cannot be obtained at all, in which case requests proceed
    /// without the header and the server's rejection drives recovery.
    pub async fn warm_credential(&self) -> Option<String> {
        if let Some(token) = self.csrf_cookie() {
            return Some(token);
        }
        let client = self.clone();
        self.credential
            .run(move || async move { client.issue_credential().await })
            .await
    }

    /// Read the anti-forgery cookie as the backend last set it. Reads go
    /// through the live jar, so a token rotated by any response is picked
    /// up on the very next attempt.
    fn csrf_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.config.origin_url())?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    /// One acquisition round trip. Callers go through the shared slot in
    /// [`Self::warm_credential`], so at most one of these runs at a time.
    async fn issue_credential(&self) -> Option<String> {
        let url = self.config.endpoint(CSRF_ISSUE_PATH);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let from_body = response
                    .json::<CsrfIssueBody>()
                    .await
                    .ok()
                    .and_then(|body| body.csrf_token);
                from_body.or_else(|| self.csrf_cookie())
            }
            Ok(response) => {
                debug!(
                    status = %response.status(),
                    "Credential endpoint refused, trying origin root"
                );
                self.refresh_credential().await
            }
            Err(e) => {
                debug!("Credential endpoint unreachable ({}), trying origin root", e);
                self.refresh_credential().await
            }
        }
    }

    /// Hit the origin root so the backend issues a fresh cookie, then
    /// re-read the jar. This is both the acquisition fallback and the
    /// forced refresh after a CSRF rejection; it bypasses the shared slot,
    /// so a retry can never reuse a token issued before the rejection.
    async fn refresh_credential(&self) -> Option<String> {
        if let Err(e) = self.http.get(self.config.origin_url()).send().await {
            warn!("Credential refresh request failed: {}", e);
        }
        self.csrf_cookie()
    }

    fn is_state_changing(method: &Method) -> bool {
        matches!(
            *method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }

    // ========================================================================
    // Request engine
    // ========================================================================

    /// Dispatch a request with the full recovery policy applied.
    ///
    /// A CSRF-classified 403 on a state-changing request is retried once
    /// with a force-refreshed token. 401s, and 403s whose detail says the
    /// session credentials themselves are missing, flip the shared session
    /// state to logged-out before the error is returned, so the caller can
    /// still unwind its own pending work.
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        let mut csrf_retries = 0;

        loop {
            let response = self.send_once(&method, &url, body).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let raw_body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status, &raw_body);

            if let ApiError::CsrfRejected { ref detail } = error {
                if Self::is_state_changing(&method) && csrf_retries < MAX_CSRF_RETRIES {
                    csrf_retries += 1;
                    warn!(
                        path,
                        detail = %detail,
                        "Request rejected by CSRF protection, retrying with a fresh token"
                    );
                    self.refresh_credential().await;
                    continue;
                }
            }

            if error.is_unauthorized() {
                debug!(path, status = %status, "Request unauthorized, session is gone");
                self.session.force_unauthenticated();
            }

            return Err(error);
        }
    }

    /// One attempt. The request is rebuilt from its parts every time, so a
    /// retry cannot observe headers left over from the failed attempt, and
    /// the token is re-read fresh for each build.
    async fn send_once<B>(
        &self,
        method: &Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method.clone(), url);

        if Self::is_state_changing(method) {
            match self.warm_credential().await {
                Some(token) => request = request.header(CSRF_HEADER, token),
                None => debug!(url, "No CSRF token available, sending without one"),
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Decode a JSON body, surfacing undecodable payloads as
    /// [`ApiError::InvalidResponse`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            debug!("Failed to decode response body: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })
    }

    // ========================================================================
    // Request methods
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    /// GET a binary payload (the exported report PDFs).
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// POST without a body (the logout endpoint takes none).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request::<()>(Method::POST, path, None).await?;
        Self::decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::PUT, path, Some(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::PATCH, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// DELETE a resource. The backend answers with no body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MarkerStore;
    use crate::nav::InProcessNavigator;
    use std::time::Duration;

    fn test_client(base: &str) -> (tempfile::TempDir, ApiClient) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::new(base, Duration::from_secs(5), dir.path().to_path_buf())
            .expect("valid test URL");
        let session = SessionHandle::new(
            MarkerStore::new(dir.path().to_path_buf()),
            Arc::new(InProcessNavigator::new()),
        );
        let client = ApiClient::new(config, session).expect("client builds");
        (dir, client)
    }

    #[test]
    fn test_state_changing_method_set() {
        assert!(ApiClient::is_state_changing(&Method::POST));
        assert!(ApiClient::is_state_changing(&Method::PUT));
        assert!(ApiClient::is_state_changing(&Method::PATCH));
        assert!(ApiClient::is_state_changing(&Method::DELETE));

        assert!(!ApiClient::is_state_changing(&Method::GET));
        assert!(!ApiClient::is_state_changing(&Method::HEAD));
        assert!(!ApiClient::is_state_changing(&Method::OPTIONS));
    }

    #[test]
    fn test_csrf_cookie_reads_latest_value_from_jar() {
        let (_dir, client) = test_client("http://localhost:8000/api");
        assert_eq!(client.csrf_cookie(), None);

        let origin = client.config.origin_url();
        client.jar.add_cookie_str("sessionid=abc123; Path=/", &origin);
        client.jar.add_cookie_str("csrftoken=tok-one; Path=/", &origin);
        assert_eq!(client.csrf_cookie().as_deref(), Some("tok-one"));

        // A rotated cookie replaces the previous value.
        client.jar.add_cookie_str("csrftoken=tok-two; Path=/", &origin);
        assert_eq!(client.csrf_cookie().as_deref(), Some("tok-two"));
    }
}
