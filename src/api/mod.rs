//! HTTP adapter for JSON APIs with observable request state. Forms own one
//! adapter each and render `is_loading`, `status_code` and `error` from it; the
//! adapter never panics on transport or HTTP failures, it resolves into an
//! [`AppError`] and records it in the state. Request bodies may contain
//! passwords, so they are never logged.

pub mod errors;
pub mod urls;

pub use errors::AppError;

use crate::{config::AppConfig, session::Context, APP_USER_AGENT};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Observable state of the most recent request made through one adapter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchState {
    pub is_loading: bool,
    pub status_code: Option<u16>,
    pub error: Option<AppError>,
}

/// HTTP client adapter. One instance tracks the state of its own calls.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    state: Arc<watch::Sender<FetchState>>,
    in_flight: Arc<AtomicUsize>,
}

impl HttpClient {
    /// Builds an adapter from the application config.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self::from_client(client, &config.api_base_url))
    }

    /// Wraps an existing client; the state starts idle.
    #[must_use]
    pub fn from_client(client: Client, base_url: &str) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            client,
            base_url: base_url.to_string(),
            state: Arc::new(state),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a new adapter sharing the connection pool but with its own state.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::from_client(self.client.clone(), &self.base_url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the current request state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes for reactive rendering.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Sends a request with an optional JSON body and decodes a JSON response.
    ///
    /// `is_loading` stays true while the call is in flight; `status_code` and
    /// `error` are cleared at the start and describe this call once it settles.
    ///
    /// # Errors
    /// Returns an `AppError` for encoding, transport, timeout, HTTP status or
    /// decoding failures. The same error is recorded in the state.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn fetch<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let in_flight = self.begin();
        let (status, result) = self.send(method, path, body).await;

        match &result {
            Ok(_) => {
                debug!(status, "request completed");
                in_flight.settle(status, None);
            }
            Err(err) => {
                warn!(error = %err, "request failed");
                in_flight.settle(status, Some(err.clone()));
            }
        }

        result
    }

    /// Marks a call as started and clears the previous outcome.
    fn begin(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.status_code = None;
            state.error = None;
        });
        InFlight {
            state: &self.state,
            in_flight: &self.in_flight,
            settled: false,
        }
    }

    /// Returns the response status, when the server answered, with the result.
    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> (Option<u16>, Result<T, AppError>)
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = match self.request(method, path, body) {
            Ok(request) => request,
            Err(err) => return (None, Err(err)),
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                (Some(status), handle_json_response(response).await)
            }
            Err(err) => (None, Err(map_request_error(err))),
        }
    }

    fn request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<RequestBuilder, AppError>
    where
        B: Serialize + ?Sized,
    {
        let url = build_url_with_base(&self.base_url, path);
        let request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");

        match body {
            Some(body) => {
                let payload = serde_json::to_vec(body).map_err(|err| {
                    AppError::Serialization(format!("Failed to encode request: {err}"))
                })?;
                Ok(request.header(CONTENT_TYPE, "application/json").body(payload))
            }
            None => Ok(request),
        }
    }
}

/// Returns the HTTP adapter provided to this context. Forms call `fresh` on
/// it so each one observes only its own requests.
///
/// # Panics
/// Panics if no adapter was provided to the context.
#[track_caller]
#[must_use]
pub fn use_client(context: &Context) -> Arc<HttpClient> {
    match context.get::<HttpClient>() {
        Some(client) => client,
        None => panic!("use_client must be used within an App"),
    }
}

/// Tracks one in-flight call. Dropping it before `settle` (the request future
/// was dropped) still releases the loading flag.
struct InFlight<'a> {
    state: &'a watch::Sender<FetchState>,
    in_flight: &'a AtomicUsize,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, status_code: Option<u16>, error: Option<AppError>) {
        self.settled = true;
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        self.state.send_modify(|state| {
            state.is_loading = remaining > 0;
            state.status_code = status_code;
            state.error = error;
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        self.state.send_modify(|state| state.is_loading = remaining > 0);
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Config(format!("Invalid request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{build_url_with_base, sanitize_body, AppError, FetchState, HttpClient};
    use crate::config::AppConfig;
    use anyhow::Result;
    use reqwest::{Client, Method};
    use serde_json::{json, Value};
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn build_url_joins_base_and_path() {
        assert_eq!(
            build_url_with_base("https://api.tld/api/", "/auth/login"),
            "https://api.tld/api/auth/login"
        );
        assert_eq!(
            build_url_with_base("https://api.tld", "auth/login"),
            "https://api.tld/auth/login"
        );
        assert_eq!(build_url_with_base("  ", "/auth/login"), "/auth/login");
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  nope \n"), "nope");
        let long = "x".repeat(500);
        assert_eq!(sanitize_body(&long).chars().count(), 200);
    }

    #[tokio::test]
    async fn fetch_records_success_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "email": "a@b.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let body = json!({ "email": "a@b.com" });
        let value: Value = client
            .fetch(Method::POST, "/auth/login", Some(&body))
            .await?;

        assert_eq!(value, json!({ "ok": true }));
        assert_eq!(
            client.state(),
            FetchState {
                is_loading: false,
                status_code: Some(200),
                error: None,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn fetch_surfaces_http_errors_in_state() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("  Invalid credentials  "))
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let result: Result<Value, AppError> = client
            .fetch(Method::POST, "/auth/login", Some(&json!({})))
            .await;

        let expected = AppError::Http {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(result.unwrap_err(), expected);

        let state = client.state();
        assert!(!state.is_loading);
        assert_eq!(state.status_code, Some(401));
        assert_eq!(state.error, Some(expected));
        Ok(())
    }

    #[tokio::test]
    async fn next_call_clears_previous_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let first: Result<Value, AppError> = client.fetch::<(), _>(Method::GET, "/broken", None).await;
        assert_eq!(
            first.unwrap_err(),
            AppError::Http {
                status: 500,
                message: "Request failed.".to_string(),
            }
        );

        let _: Value = client.fetch::<(), _>(Method::GET, "/fine", None).await?;
        let state = client.state();
        assert_eq!(state.status_code, Some(200));
        assert_eq!(state.error, None);
        Ok(())
    }

    #[tokio::test]
    async fn is_loading_is_true_only_while_in_flight() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let mut receiver = client.subscribe();
        assert!(!client.is_loading());

        let call = client.fetch::<(), Value>(Method::GET, "/slow", None);
        let watcher = async {
            receiver.changed().await.unwrap();
            receiver.borrow().is_loading
        };
        let (result, observed_loading) = tokio::join!(call, watcher);

        result?;
        assert!(observed_loading);
        assert!(!client.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn dropped_call_releases_loading_flag() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/hang"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let call = client.fetch::<(), Value>(Method::GET, "/hang", None);
        let outcome = tokio::time::timeout(Duration::from_millis(100), call).await;

        assert!(outcome.is_err());
        assert!(!client.is_loading());
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_calls_keep_loading_until_the_last_settles() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "call": "slow" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let slow = client.fetch::<(), Value>(Method::GET, "/slow", None);
        let fast = async {
            let result = client.fetch::<(), Value>(Method::GET, "/fast", None).await;
            (result, client.is_loading())
        };
        let (slow_result, (fast_result, loading_after_fast)) = tokio::join!(slow, fast);

        assert!(matches!(fast_result, Err(AppError::Http { status: 503, .. })));
        assert!(loading_after_fast);
        assert_eq!(slow_result?, json!({ "call": "slow" }));

        // the slow call settled last, so it owns the state
        assert_eq!(
            client.state(),
            FetchState {
                is_loading: false,
                status_code: Some(200),
                error: None,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn configured_timeout_is_reported_as_timeout() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = AppConfig {
            api_base_url: server.uri(),
            request_timeout: Duration::from_millis(100),
            ..AppConfig::default()
        };
        let client = HttpClient::new(&config)?;
        let result: Result<Value, AppError> = client
            .fetch(Method::POST, "/auth/login", Some(&json!({})))
            .await;

        let expected = AppError::Timeout("Request timed out. Please try again.".to_string());
        assert_eq!(result.unwrap_err(), expected);

        let state = client.state();
        assert!(!state.is_loading);
        assert_eq!(state.status_code, None);
        assert_eq!(state.error, Some(expected));
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_success_keeps_its_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::from_client(Client::new(), &server.uri());
        let result: Result<Value, AppError> = client
            .fetch(Method::POST, "/auth/login", Some(&json!({})))
            .await;

        assert!(matches!(result, Err(AppError::Parse(_))));
        let state = client.state();
        assert_eq!(state.status_code, Some(200));
        assert!(matches!(state.error, Some(AppError::Parse(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = HttpClient::from_client(Client::new(), "http://127.0.0.1:1");
        let result: Result<Value, AppError> = client.fetch::<(), _>(Method::GET, "/", None).await;

        assert!(matches!(result, Err(AppError::Network(_))));
        let state = client.state();
        assert!(!state.is_loading);
        assert_eq!(state.status_code, None);
        assert!(matches!(state.error, Some(AppError::Network(_))));
    }
}
