//! HTTP transport boundary.
//!
//! Everything above this module speaks [`HttpRequest`]/[`HttpResponse`]; the
//! production transport delegates to an authenticated [`Octocrab`] client.

use super::GitHubError;
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;

/// Preview media types needed by the import, projects and timeline APIs.
const PREVIEW_MEDIA_TYPES: &[&str] = &[
    "application/vnd.github.v3+json",
    "application/vnd.github.golden-comet-preview+json",
    "application/vnd.github.inertia-preview+json",
    "application/vnd.github.mockingbird-preview+json",
    "application/vnd.github.sailor-v-preview+json",
    "application/vnd.github.starfox-preview+json",
];

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

/// Value sent as `User-Agent`.
pub const USER_AGENT_NAME: &str = "github-migrator";

/// HTTP methods used by the migrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Representation requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Diff,
}

impl MediaType {
    fn accept(self) -> String {
        match self {
            Self::Json => PREVIEW_MEDIA_TYPES.join(", "),
            Self::Diff => DIFF_MEDIA_TYPE.to_string(),
        }
    }
}

/// A request against an absolute API URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub media_type: MediaType,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a JSON request without a body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            media_type: MediaType::Json,
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }
}

/// A response with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Returns the first header matching `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true for statuses in `[200, 400)`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request; only failures to obtain a response are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GitHubError>;
}

/// Transport backed by an authenticated octocrab client.
pub struct OctocrabTransport {
    octocrab: Octocrab,
}

impl OctocrabTransport {
    /// Builds a client for `endpoint` authenticated with a personal token.
    ///
    /// octocrab's own retry layer is switched off; [`ApiClient`] owns the
    /// retry schedule and every call here is exactly one HTTP exchange.
    ///
    /// [`ApiClient`]: super::ApiClient
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URI or the client
    /// cannot be constructed.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder()
            .base_uri(endpoint)?
            .personal_token(token.to_string())
            .add_header(USER_AGENT, USER_AGENT_NAME.to_string())
            .add_header(ACCEPT, MediaType::Json.accept())
            .add_retry_config(RetryConfig::None)
            .build()?;
        Ok(Self { octocrab })
    }
}

#[async_trait]
impl Transport for OctocrabTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GitHubError> {
        let url = request.url.as_str();
        let body = request.body.as_ref();
        let response = match request.method {
            Method::Get => {
                let mut headers = HeaderMap::new();
                let accept = HeaderValue::from_str(&request.media_type.accept())
                    .map_err(|e| GitHubError::Transport(e.to_string()))?;
                headers.insert(ACCEPT, accept);
                self.octocrab._get_with_headers(url, Some(headers)).await
            }
            Method::Post => self.octocrab._post(url, body).await,
            Method::Patch => self.octocrab._patch(url, body).await,
            Method::Delete => self.octocrab._delete(url, body).await,
        }
        .map_err(|e| GitHubError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(|e| GitHubError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) use mock::MockTransport;

#[cfg(test)]
mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockState {
        routes: HashMap<(Method, String), VecDeque<HttpResponse>>,
        requests: Vec<HttpRequest>,
    }

    /// In-memory transport returning queued responses per method and URL.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        inner: Mutex<MockState>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Queues a response; repeated pushes for one key are served FIFO.
        pub(crate) fn push(&self, method: Method, url: &str, response: HttpResponse) {
            let mut inner = self.inner.lock().expect("mock transport lock poisoned");
            inner
                .routes
                .entry((method, url.to_string()))
                .or_default()
                .push_back(response);
        }

        pub(crate) fn push_json(&self, method: Method, url: &str, status: u16, body: &str) {
            self.push(method, url, response(status, body));
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.inner
                .lock()
                .expect("mock transport lock poisoned")
                .requests
                .clone()
        }
    }

    pub(crate) fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GitHubError> {
            let mut inner = self.inner.lock().expect("mock transport lock poisoned");
            let key = (request.method, request.url.clone());
            inner.requests.push(request);

            match inner.routes.get_mut(&key).and_then(VecDeque::pop_front) {
                Some(response) => Ok(response),
                None => Ok(HttpResponse {
                    status: 404,
                    headers: Vec::new(),
                    body: format!(
                        r#"{{"message":"no mock response for {} {}"}}"#,
                        key.0.as_str(),
                        key.1
                    ),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `503` to every connection and counts them.
    async fn unavailable_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), hits)
    }

    #[tokio::test]
    async fn test_octocrab_transport_sends_once() {
        let (endpoint, hits) = unavailable_server().await;
        let transport = OctocrabTransport::new(&endpoint, "t0ken").unwrap();

        let response = transport
            .send(HttpRequest::new(Method::Get, format!("{endpoint}/user")))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Link".to_string(), "<a>; rel=\"next\"".to_string())],
            body: String::new(),
        };

        assert_eq!(response.header("link"), Some("<a>; rel=\"next\""));
        assert_eq!(response.header("etag"), None);
        assert!(response.is_success());
    }

    #[test]
    fn test_diff_media_type() {
        assert_eq!(MediaType::Diff.accept(), "application/vnd.github.v3.diff");
        assert!(MediaType::Json
            .accept()
            .contains("application/vnd.github.golden-comet-preview+json"));
    }

    #[tokio::test]
    async fn test_mock_transport_serves_fifo_and_records() {
        let transport = MockTransport::new();
        transport.push_json(Method::Get, "https://api/x", 500, "{}");
        transport.push_json(Method::Get, "https://api/x", 200, "[]");

        let first = transport
            .send(HttpRequest::new(Method::Get, "https://api/x"))
            .await
            .unwrap();
        let second = transport
            .send(HttpRequest::new(Method::Get, "https://api/x"))
            .await
            .unwrap();
        let missing = transport
            .send(HttpRequest::new(Method::Post, "https://api/x"))
            .await
            .unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(missing.status, 404);
        assert_eq!(transport.requests().len(), 3);
    }
}
