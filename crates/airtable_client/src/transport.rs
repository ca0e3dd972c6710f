//! The seam between the executor and the network.

use airtable_error::{AirtableResult, SerializationError, TransportError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

/// Methods the record API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpMethod {
    /// List or filter records
    #[display("GET")]
    Get,
    /// Create records
    #[display("POST")]
    Post,
    /// Update records
    #[display("PATCH")]
    Patch,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A fully built request, resent unchanged on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PreparedRequest {
    /// HTTP method
    method: HttpMethod,
    /// Absolute URL, query included
    url: String,
    /// Header name/value pairs
    headers: Vec<(&'static str, String)>,
    /// JSON body, if any
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Request without headers.
    pub fn new(method: HttpMethod, url: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and fully-read body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Body text
    pub body: String,
}

impl HttpResponse {
    /// Assemble a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> AirtableResult<T> {
        serde_json::from_str(&self.body).map_err(|e| SerializationError::from(e).into())
    }
}

/// Sends one request and reads the whole response.
///
/// Implementations report network failures as transport errors and hand back
/// every response, whatever its status.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Dispatch `request` once.
    async fn send(&self, request: &PreparedRequest) -> AirtableResult<HttpResponse>;
}

/// Production transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the TLS backend cannot be initialized.
    pub fn new() -> AirtableResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("airtable-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn send(&self, request: &PreparedRequest) -> AirtableResult<HttpResponse> {
        let mut builder = self
            .client
            .request(reqwest::Method::from(*request.method()), request.url().as_str());
        for (name, value) in request.headers() {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "Failed to send request to Airtable");
            TransportError::new(format!("Request to {} failed: {}", request.url(), e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Airtable response body");
            TransportError::new(format!("Reading response from {} failed: {}", request.url(), e))
        })?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = PreparedRequest::new(HttpMethod::Get, "http://x", None)
            .with_header("Authorization", "Bearer k");
        assert_eq!(request.header("authorization"), Some("Bearer k"));
        assert_eq!(request.header("Content-Type"), None);
    }

    #[test]
    fn method_maps_to_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn json_decode_failure_is_serialization_error() {
        let response = HttpResponse::new(200, "not json");
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(
            err.kind(),
            airtable_error::AirtableErrorKind::Serialization(_)
        ));
    }
}
