//! HTTP boundary between controllers and the REST API
//!
//! Controllers only see the [`Transport`] trait. [`HttpTransport`] talks to a
//! live server with reqwest; [`MemoryTransport`] answers from canned responses.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Failures below the HTTP status level
///
/// A response with a non-2xx status is not an error here; it comes back as a
/// [`Response`] and the controller decides what to do with it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A complete HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A 200 response carrying `body` serialized as JSON
    pub fn json(body: &Value) -> Self {
        Self::new(200, body.to_string())
            .with_header("content-type", "application/json")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with this name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Issues one request and returns the whole response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request for `path` (absolute, e.g. `/api/modules`)
    async fn send(&self, method: Method, path: &str) -> Result<Response, FetchError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

// ============================================================================
// reqwest backend
// ============================================================================

/// Transport backed by a reqwest client and a base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid API base url: {base_url}"))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str) -> Result<Response, FetchError> {
        let url = self.url_for(path)?;
        debug!(%method, %url, "sending request");

        let to_error = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let resp = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .map_err(to_error)?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp.text().await.map_err(to_error)?;

        Ok(Response { status, headers, body })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Transport answering from canned responses
///
/// Requests for unknown (method, path) pairs get a 404. Every request is
/// recorded so callers can check what was sent.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: HashMap<(Method, String), Response>,
    requests: Mutex<Vec<(Method, String)>>,
}

#[derive(Deserialize)]
struct Fixture {
    #[serde(default = "default_status")]
    status: u16,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Value,
}

fn default_status() -> u16 {
    200
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `response`
    pub fn with_response(mut self, method: Method, path: impl Into<String>, response: Response) -> Self {
        self.responses.insert((method, path.into()), response);
        self
    }

    /// Answer `GET path` with a 200 JSON body
    pub fn with_json(self, path: impl Into<String>, body: Value) -> Self {
        self.with_response(Method::GET, path, Response::json(&body))
    }

    /// Load canned responses from a fixtures document
    ///
    /// Keys are `"METHOD /path"` or just `"/path"` (GET). Values carry an
    /// optional `status` (200), optional `headers` and a `body`; a string body
    /// is sent verbatim, anything else as JSON.
    ///
    /// ```json
    /// { "/api/modules": { "body": [{"name": "Core"}] },
    ///   "GET /api/sites": { "status": 500, "body": "boom" } }
    /// ```
    pub fn from_fixtures(doc: &Value) -> Result<Self> {
        let Some(entries) = doc.as_object() else {
            bail!("Fixtures must be a JSON object keyed by request");
        };

        let mut transport = Self::new();
        for (key, entry) in entries {
            let (method, path) = match key.split_once(' ') {
                Some((m, p)) => (
                    Method::from_bytes(m.as_bytes())
                        .with_context(|| format!("Invalid method in fixture key {key:?}"))?,
                    p.trim(),
                ),
                None => (Method::GET, key.as_str()),
            };

            let fixture: Fixture = serde_json::from_value(entry.clone())
                .with_context(|| format!("Invalid fixture for {key:?}"))?;

            let body = match &fixture.body {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            let mut response = Response::new(fixture.status, body);
            response.headers = fixture.headers.into_iter().collect();

            transport = transport.with_response(method, path, response);
        }
        Ok(transport)
    }

    /// Requests seen so far, in order
    pub async fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, method: Method, path: &str) -> Result<Response, FetchError> {
        self.requests.lock().await.push((method.clone(), path.to_string()));

        Ok(self
            .responses
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| Response::new(404, "Not Found")))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_transport_answers_and_records() {
        let transport = MemoryTransport::new().with_json("/api/modules", json!([{"name": "Core"}]));

        let resp = transport.send(Method::GET, "/api/modules").await.unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body, r#"[{"name":"Core"}]"#);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));

        let missing = transport.send(Method::PUT, "/api/modules").await.unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(
            transport.requests().await,
            vec![
                (Method::GET, "/api/modules".to_string()),
                (Method::PUT, "/api/modules".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fixtures() {
        let doc = json!({
            "/doc/api": { "body": "# API" },
            "POST /doc/api/modules/core": { "status": 500, "headers": {"x-trace": "1"}, "body": {"error": "boom"} }
        });
        let transport = MemoryTransport::from_fixtures(&doc).unwrap();

        let intro = transport.send(Method::GET, "/doc/api").await.unwrap();
        assert_eq!(intro.status, 200);
        assert_eq!(intro.body, "# API");

        let failed = transport.send(Method::POST, "/doc/api/modules/core").await.unwrap();
        assert_eq!(failed.status, 500);
        assert_eq!(failed.header("x-trace"), Some("1"));
        assert_eq!(failed.body, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_fixtures_must_be_object() {
        assert!(MemoryTransport::from_fixtures(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_http_transport_rejects_bad_base() {
        assert!(HttpTransport::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_http_transport_joins_paths() {
        let transport = HttpTransport::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:9000");
        let url = transport.url_for("/api/modules/core").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/modules/core");
    }
}
