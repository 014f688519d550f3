use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response, StatusCode};
use teamlink_domain::TeamLinkError;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Outbound HTTP for Graph and the Bot Framework connector.
///
/// [`HttpClient::send`] performs exactly one exchange. [`HttpClient::read`]
/// is for collection reads: GETs that Graph throttled (429) or that hit a
/// transient gateway status are retried, honouring `Retry-After`. Polling
/// loops must use `send` so every poll is a single request.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

/// Retry budget for [`HttpClient::read`]
#[derive(Clone, Copy, Debug)]
struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
    max_retry_after: Duration,
}

impl RetryPolicy {
    fn retries_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    }

    /// Delay before retry number `retry` (1-based)
    fn delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.map_or_else(
            || self.base_backoff.saturating_mul(1 << retry.saturating_sub(1).min(6)),
            |hint| hint.min(self.max_retry_after),
        )
    }
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and read retry budget.
    pub fn new() -> Result<Self, TeamLinkError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute a request exactly once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TeamLinkError> {
        self.execute_once(build(builder)?).await
    }

    async fn execute_once(&self, request: Request) -> Result<Response, TeamLinkError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            TeamLinkError::from(InfraError::from(err))
        })?;
        debug!(%method, %url, status = %response.status(), "received HTTP response");
        Ok(response)
    }

    /// Execute a read, retrying throttled and transient failures.
    ///
    /// Anything other than a GET is sent once.
    pub async fn read(&self, builder: RequestBuilder) -> Result<Response, TeamLinkError> {
        let request = build(builder)?;
        if request.method() != Method::GET {
            return self.execute_once(request).await;
        }

        let url = request.url().clone();
        let mut attempt = 1;
        loop {
            let Some(next) = request.try_clone() else {
                return Err(TeamLinkError::Internal(format!("GET {url} cannot be cloned for retry")));
            };
            let last = attempt >= self.retry.max_attempts;

            match self.client.execute(next).await {
                Ok(response) if !last && RetryPolicy::retries_status(response.status()) => {
                    let delay = self.retry.delay(attempt, retry_after(&response));
                    warn!(%url, status = %response.status(), attempt, delay_ms = delay.as_millis(), "read throttled, retrying");
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    debug!(%url, status = %response.status(), attempt, "received HTTP response");
                    return Ok(response);
                }
                Err(err) if !last && (err.is_timeout() || err.is_connect()) => {
                    let delay = self.retry.delay(attempt, None);
                    warn!(%url, error = %err, attempt, "read failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(TeamLinkError::from(InfraError::from(err))),
            }
            attempt += 1;
        }
    }
}

fn build(builder: RequestBuilder) -> Result<Request, TeamLinkError> {
    builder.build().map_err(|err| TeamLinkError::from(InfraError::from(err)))
}

/// `Retry-After` as delta-seconds; HTTP-date values are ignored.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy {
                max_attempts: 3,
                base_backoff: Duration::from_millis(250),
                max_retry_after: Duration::from_secs(10),
            },
            user_agent: concat!("teamlink/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for [`HttpClient::read`], including the first.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    /// Upper bound applied to server-supplied `Retry-After` hints.
    pub const fn max_retry_after(mut self, cap: Duration) -> Self {
        self.retry.max_retry_after = cap;
        self
    }

    pub fn build(self) -> Result<HttpClient, TeamLinkError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|err| TeamLinkError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}
