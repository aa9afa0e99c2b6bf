// Allow dead code: shared helpers not every test file uses
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hourbook_client::{ApiClient, Config, MarkerStore, Navigator, SessionHandle};
use wiremock::{MockServer, Request};

/// Navigator that records where the user is and how often they were moved.
pub struct CountingNavigator {
    current: Mutex<String>,
    navigations: AtomicUsize,
}

impl CountingNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new("/".to_string()),
            navigations: AtomicUsize::new(0),
        }
    }

    /// Place the user on a route without counting it as a redirect.
    pub fn set_current(&self, path: &str) {
        *self.current.lock().unwrap() = path.to_string();
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, path: &str) {
        *self.current.lock().unwrap() = path.to_string();
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }
}

/// A mock backend plus a client wired against it.
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
    pub session: SessionHandle,
    pub nav: Arc<CountingNavigator>,
    pub _state: tempfile::TempDir,
}

/// Route client logs through the test harness. Run with RUST_LOG set to
/// see them; repeated calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn backend() -> TestBackend {
    init_tracing();
    let server = MockServer::start().await;
    let state = tempfile::tempdir().expect("tempdir");
    let config = Config::new(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        state.path().to_path_buf(),
    )
    .expect("valid test URL");

    let nav = Arc::new(CountingNavigator::new());
    let session = SessionHandle::new(MarkerStore::new(state.path().to_path_buf()), nav.clone());
    let client = ApiClient::new(config, session.clone()).expect("client builds");

    TestBackend {
        server,
        client,
        session,
        nav,
        _state: state,
    }
}

/// All requests the server has seen for one path, in arrival order.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

pub fn csrf_header(request: &Request) -> Option<String> {
    request
        .headers
        .get("X-CSRFToken")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Poll until the server has seen a request matching `pred`. Panics if it
/// never arrives; used for work that happens on a background task.
pub async fn wait_for_request<F>(server: &MockServer, pred: F)
where
    F: Fn(&Request) -> bool,
{
    for _ in 0..100 {
        let seen = server.received_requests().await.unwrap_or_default();
        if seen.iter().any(&pred) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected request never arrived");
}
