//! HTTP client for the WebBook.
//!
//! [`WebBookClient`] owns one pooled `reqwest::Client` plus the immutable
//! [`RequestConfig`] it was built from. Every request runs the same cycle:
//! send, pause for the configured delay, and retry transient failures until the
//! attempt budget is spent.

use std::panic::{AssertUnwindSafe, catch_unwind};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{debug, instrument, warn};
use url::Url;

use super::retry::{RetryDecision, RetryPolicy, classify_error, classify_http_status};
use super::{BASE_URL, RequestConfig, RequestError};

/// A fetched WebBook page.
#[derive(Debug, Clone)]
pub struct WebBookResponse {
    /// Final URL after redirects.
    pub url: Url,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Response body. HTML bodies have known markup typos repaired.
    pub text: String,
}

impl WebBookResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the server labelled the body as HTML.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"))
    }
}

/// Repairs markup typos the WebBook is known to emit.
///
/// `clss=` appears in place of `class=` on some InChI spans, and non-breaking
/// spaces break label matching.
#[must_use]
pub fn fix_html(html: &str) -> String {
    html.replace("clss=", "class=").replace('\u{a0}', " ")
}

/// Rate-limited, retrying GET client bound to one WebBook host.
///
/// Cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use webbook::request::{RequestConfig, WebBookClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WebBookClient::new(RequestConfig::default())?;
/// let url = client.endpoint("/cgi/cbook.cgi")?;
/// let page = client.get_ok(&url, [("ID", "C71432")]).await?;
/// println!("{} bytes", page.text.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebBookClient {
    client: Client,
    base_url: Url,
    config: RequestConfig,
    retry: RetryPolicy,
}

impl WebBookClient {
    /// Creates a client for the public WebBook host.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: RequestConfig) -> Result<Self, RequestError> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Creates a client for a custom host (mirrors, integration tests).
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidUrl`] for an unparseable base URL and
    /// [`RequestError::ClientBuild`] if the HTTP client cannot be constructed.
    #[instrument(skip(config, base_url))]
    pub fn with_base_url(
        config: RequestConfig,
        base_url: impl AsRef<str>,
    ) -> Result<Self, RequestError> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw).map_err(|_| RequestError::invalid_url(raw))?;
        let client = build_http_client(&config)?;
        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::new(config.max_attempts()),
            config,
        })
    }

    /// Configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Host every relative link is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an absolute URL for a server path such as `/cgi/cbook.cgi`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidUrl`] if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        self.absolutize(path)
    }

    /// Resolves an `href` taken from a WebBook page.
    ///
    /// Absolute links pass through; relative links are joined with the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidUrl`] if the link cannot be resolved.
    pub fn absolutize(&self, href: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(href.trim())
            .map_err(|_| RequestError::invalid_url(href))
    }

    /// Issues a GET and returns the last response, even a non-success one.
    ///
    /// Transient failures are retried up to the configured attempt budget,
    /// pausing for the configured delay after every response. A non-success
    /// status left after the budget is spent is returned as a response;
    /// transport errors are returned as errors.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when no response could be obtained.
    #[instrument(skip(self, params), fields(url = %url))]
    pub async fn get<I, K, V>(&self, url: &Url, params: I) -> Result<WebBookResponse, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request_url = with_query(url, params);
        let mut attempt = 1;
        loop {
            let outcome = self.send_once(&request_url).await;
            match outcome {
                Ok(response) if response.is_success() => {
                    self.pause().await;
                    return Ok(response);
                }
                Ok(response) => {
                    let failure = classify_http_status(response.status);
                    self.pause().await;
                    match self.retry.should_retry(failure, attempt) {
                        RetryDecision::Retry { attempt: next } => {
                            warn!(status = response.status, attempt, "retrying WebBook request");
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(status = response.status, %reason, "giving up on status");
                            return Ok(response);
                        }
                    }
                }
                Err(error) => match self.retry.should_retry(classify_error(&error), attempt) {
                    RetryDecision::Retry { attempt: next } => {
                        warn!(error = %error, attempt, "retrying WebBook request");
                        self.pause().await;
                        attempt = next;
                    }
                    RetryDecision::DoNotRetry { reason } => {
                        debug!(error = %error, %reason, "giving up on transport error");
                        return Err(error);
                    }
                },
            }
        }
    }

    /// Issues a GET and requires a success status.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::HttpStatus`] when the final status is not 2xx, or
    /// any transport error from [`WebBookClient::get`].
    pub async fn get_ok<I, K, V>(
        &self,
        url: &Url,
        params: I,
    ) -> Result<WebBookResponse, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let response = self.get(url, params).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(RequestError::http_status(
                response.url.as_str(),
                response.status,
                self.retry.max_attempts(),
            ))
        }
    }

    async fn send_once(&self, url: &Url) -> Result<WebBookResponse, RequestError> {
        debug!(url = %url, "sending WebBook request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| RequestError::network(url.as_str(), error))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|error| RequestError::body(final_url.as_str(), error))?;

        let mut page = WebBookResponse {
            url: final_url,
            status,
            content_type,
            text: body,
        };
        if page.is_html() {
            page.text = fix_html(&page.text);
        }
        Ok(page)
    }

    async fn pause(&self) {
        let delay = self.config.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn with_query<I, K, V>(url: &Url, params: I) -> Url
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = url.clone();
    let mut pairs = params.into_iter().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

fn build_http_client(config: &RequestConfig) -> Result<Client, RequestError> {
    match try_build_client(config, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed environments panic when querying system proxy
            // settings; fall back to env-proxy configuration only.
            warn!("HTTP client hit system proxy panic; using env-proxy fallback builder");
            match try_build_client(config, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(RequestError::client_build(
                    "HTTP client construction panicked while loading proxy settings",
                )),
                Err(BuildClientFailure::Build(error)) => {
                    Err(RequestError::client_build(error.to_string()))
                }
            }
        }
        Err(BuildClientFailure::Build(error)) => {
            Err(RequestError::client_build(error.to_string()))
        }
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    config: &RequestConfig,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let transport = config.transport().clone();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = Client::builder()
            .connect_timeout(transport.connect_timeout)
            .timeout(transport.timeout)
            .user_agent(transport.user_agent)
            .gzip(true);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
