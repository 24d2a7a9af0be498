//! Authenticated request cycle with retries and pagination.

use super::link::next_link;
use super::models::User;
use super::retry::RetryPolicy;
use super::transport::{HttpRequest, HttpResponse, MediaType, Method, Transport};
use super::{GitHubError, Items};
use crate::rate_limit::{wait_if_needed, RateLimitInfo};
use backon::Retryable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, debug_span, warn, Instrument};

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";

/// One page of a list endpoint.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absolute URL of the following page.
    pub next: Option<String>,
}

/// Client for one GitHub API endpoint.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client sending requests for `endpoint` through `transport`.
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the API endpoint without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolves `path` against the endpoint; absolute URLs pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.endpoint, path)
        }
    }

    /// Sends a request, retrying retryable failures per the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once the
    /// attempts are exhausted.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, GitHubError> {
        let span = debug_span!("request", method = request.method.as_str(), url = %request.url);
        let attempts = AtomicU32::new(0);
        let request = &request;
        let attempts_ref = &attempts;

        let send_once = move || {
            attempts_ref.fetch_add(1, Ordering::SeqCst);
            self.send_once(request)
        };

        send_once
            .retry(self.retry)
            .when(GitHubError::is_retryable)
            .notify(|err: &GitHubError, delay| {
                warn!(
                    url = %request.url,
                    attempt = attempts.load(Ordering::SeqCst),
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "Request failed, retrying"
                );
            })
            .instrument(span)
            .await
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, GitHubError> {
        let response = self.transport.send(request.clone()).await?;
        debug!(status = response.status, "Received response");

        if let Some(info) = RateLimitInfo::from_response(&response) {
            wait_if_needed(&info).await;
        }

        if response.is_success() {
            Ok(response)
        } else {
            Err(GitHubError::from_response(response.status, &response.body))
        }
    }

    /// GETs and decodes a single resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let url = self.url(path);
        let response = self.send(HttpRequest::new(Method::Get, url.as_str())).await?;
        decode(&url, &response.body)
    }

    /// POSTs `body` and decodes the created resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GitHubError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::Post, path, body).await
    }

    /// PATCHes `body` and decodes the updated resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, GitHubError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::Patch, path, body).await
    }

    /// DELETEs a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, path: &str) -> Result<(), GitHubError> {
        self.send(HttpRequest::new(Method::Delete, self.url(path)))
            .await
            .map(|_| ())
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, GitHubError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let body = serde_json::to_value(body).map_err(|source| GitHubError::Encode {
            url: url.clone(),
            source,
        })?;
        let response = self
            .send(HttpRequest::new(method, url.as_str()).with_body(body))
            .await?;
        decode(&url, &response.body)
    }

    /// Fetches one page of a list endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array
    /// of `T`.
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, GitHubError> {
        let url = self.url(url);
        let response = self.send(HttpRequest::new(Method::Get, url.as_str())).await?;
        let items = decode(&url, &response.body)?;
        let next = response.header("link").and_then(next_link);
        Ok(Page { items, next })
    }

    /// GETs the unified diff representation of a commit or comparison.
    ///
    /// An empty comparison yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::UnexpectedDiff`] if the body is not a diff.
    pub async fn get_diff(&self, path: &str) -> Result<String, GitHubError> {
        let url = self.url(path);
        let request = HttpRequest::new(Method::Get, url.as_str()).with_media_type(MediaType::Diff);
        let response = self.send(request).await?;
        if response.body.is_empty() || response.body.starts_with("diff") {
            Ok(response.body)
        } else {
            Err(GitHubError::UnexpectedDiff { url })
        }
    }

    /// Lists every record of a paginated endpoint.
    ///
    /// Pages are fetched by a background task following `rel="next"` links
    /// until none is returned; records arrive in page order.
    pub fn list<T>(self: &Arc<Self>, path: &str) -> Items<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(super::items::CHANNEL_CAPACITY);
        let client = Arc::clone(self);
        let mut url = self.url(path);

        tokio::spawn(async move {
            loop {
                let page = match client.get_page::<T>(&url).await {
                    Ok(page) => page,
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                };
                for item in page.items {
                    if tx.send(Ok(item)).await.is_err() {
                        return;
                    }
                }
                match page.next {
                    Some(next) => url = next,
                    None => return,
                }
            }
        });

        Items::new(rx)
    }

    /// Returns the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected.
    pub async fn login(&self) -> Result<User, GitHubError> {
        self.get("/user").await
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, GitHubError> {
    serde_json::from_str(body).map_err(|source| GitHubError::Decode {
        url: url.to_string(),
        source,
    })
}
