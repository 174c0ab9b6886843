//! HTTP transport used to reach the UGS server.
//!
//! The publisher only describes requests; sending them is delegated to an
//! [`HttpTransport`]. [`ReqwestTransport`] is the stock implementation. Hosts
//! that own their own HTTP stack implement the trait themselves.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use ugs_core::BasicCredentials;

/// Request timeout applied by [`ReqwestTransport`].
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors that can occur while constructing a [`ReqwestTransport`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportBuildError {
    /// The trust-root override is not a valid PEM certificate.
    #[error("invalid trust root certificate: {0}")]
    Certificate(#[source] reqwest::Error),

    /// The underlying client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub credentials: Option<BasicCredentials>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// `GET` that expects a JSON answer.
    #[must_use]
    pub fn get_json(url: impl Into<String>, credentials: Option<BasicCredentials>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![accept_json()],
            credentials,
            body: None,
        }
    }

    /// `POST` of a JSON document that expects a JSON answer.
    #[must_use]
    pub fn post_json(
        url: impl Into<String>,
        credentials: Option<BasicCredentials>,
        body: String,
    ) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![
                accept_json(),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            credentials,
            body: Some(body),
        }
    }
}

fn accept_json() -> (String, String) {
    ("Accept".to_string(), "application/json".to_string())
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, e.g. `Internal Server Error`.
    pub status_text: String,
    /// `None` when the server sent no content.
    pub body: Option<String>,
}

/// Sends requests on behalf of the publisher.
///
/// Failures below HTTP (DNS, TCP, TLS, timeouts) are returned as opaque
/// errors; any HTTP status, including errors, is a successful
/// [`HttpResponse`].
#[async_trait]
pub trait HttpTransport: fmt::Debug + Send + Sync {
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with [`DEFAULT_CONNECTION_TIMEOUT`] and the
    /// system trust roots.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError::Client`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    trust_root_pem: Option<Vec<u8>>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONNECTION_TIMEOUT,
            trust_root_pem: None,
        }
    }
}

impl ReqwestTransportBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Trusts an additional PEM-encoded root certificate, for servers behind
    /// an internal CA.
    #[must_use]
    pub fn trust_root_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.trust_root_pem = Some(pem.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`TransportBuildError::Certificate`] if the trust root is not
    /// valid PEM, or [`TransportBuildError::Client`] if the client cannot be
    /// built.
    pub fn build(self) -> Result<ReqwestTransport, TransportBuildError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if let Some(pem) = &self.trust_root_pem {
            let certificate =
                reqwest::Certificate::from_pem(pem).map_err(TransportBuildError::Certificate)?;
            builder = builder.add_root_certificate(certificate);
        }

        let http = builder.build().map_err(TransportBuildError::Client)?;
        Ok(ReqwestTransport { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(
                &credentials.username,
                Some(credentials.password.expose()),
            );
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: (!content.is_empty()).then_some(content),
        })
    }
}
