//! Transport abstraction for the actual HTTP fetch.
//!
//! The core never talks to the network directly: a
//! [`Client`](crate::client::Client) walks generated URL lists and hands
//! each URL to a [`Transport`]. The production implementation is a thin wrapper over a
//! blocking reqwest client; tests inject mocks.

use std::time::Duration;

use thiserror::Error;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header.
///
/// Some sites serve reduced markup to unknown agents, so the default
/// identifies as a browser-compatible client.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; urlgrid)";

/// Default decode charset applied when a response does not declare one.
const DEFAULT_ENCODING: &str = "utf-8";

/// Errors surfaced by a transport for a single URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or completed.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be decoded as text.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// The fetch capability the orchestrator depends on.
///
/// Implementations own the text decoding: `encoding` is the charset used as
/// a fallback when the response itself does not declare one.
pub trait Transport: Send + Sync {
    /// Fetches one URL and returns its body as text.
    fn fetch(&self, url: &str) -> Result<String, TransportError>;

    /// The fallback decode charset, e.g. `"utf-8"`.
    fn encoding(&self) -> &str;

    /// Replaces the fallback decode charset.
    fn set_encoding(&mut self, charset: &str);
}

/// Production transport on a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    encoding: String,
}

impl HttpTransport {
    /// Creates a transport with the default timeout and user agent.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            encoding: DEFAULT_ENCODING.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text_with_charset(&self.encoding)
            .map_err(|e| TransportError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn set_encoding(&mut self, charset: &str) {
        self.encoding = charset.to_string();
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock transport returning one fixed response for every URL.
    pub struct MockTransport {
        pub response: Result<String, TransportError>,
        pub encoding: String,
    }

    impl MockTransport {
        pub fn ok(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                encoding: "utf-8".to_string(),
            }
        }

        pub fn failing(error: TransportError) -> Self {
            Self {
                response: Err(error),
                encoding: "utf-8".to_string(),
            }
        }
    }

    impl Transport for MockTransport {
        fn fetch(&self, _url: &str) -> Result<String, TransportError> {
            self.response.clone()
        }

        fn encoding(&self) -> &str {
            &self.encoding
        }

        fn set_encoding(&mut self, charset: &str) {
            self.encoding = charset.to_string();
        }
    }

    #[test]
    fn test_mock_transport_success() {
        let mock = MockTransport::ok("<html></html>");
        assert_eq!(mock.fetch("http://example.com").unwrap(), "<html></html>");
    }

    #[test]
    fn test_mock_transport_error() {
        let mock = MockTransport::failing(TransportError::Status {
            url: "http://example.com".to_string(),
            status: 404,
        });
        assert!(mock.fetch("http://example.com").is_err());
    }

    #[test]
    fn test_http_transport_construction() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.encoding(), "utf-8");
    }

    #[test]
    fn test_encoding_is_replaceable() {
        let mut transport = HttpTransport::new().unwrap();
        transport.set_encoding("iso-8859-2");
        assert_eq!(transport.encoding(), "iso-8859-2");
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::Status {
            url: "http://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://example.com/a");
    }
}
