//! The seam between the sans-IO client and the network.
//!
//! # Design
//! A `Transport` executes exactly one `HttpRequest`. Every HTTP status,
//! 4xx and 5xx included, comes back as an `HttpResponse`; only failures
//! that prevent a response from existing are `TransportError`s. Timeouts
//! and cancellation are the transport's business.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes HTTP requests on behalf of [`Database`](crate::Database).
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::time::Duration;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// Status-code-as-error is disabled so 4xx/5xx responses reach the
    /// client's normalization rules as data. Response bodies are read in
    /// full unless a limit is set with [`UreqTransport::with_body_limit`].
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
        body_limit: u64,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::build(None)
        }

        /// Bound each request (connect, send, receive) by `timeout`.
        pub fn with_timeout(timeout: Duration) -> Self {
            Self::build(Some(timeout))
        }

        /// Fail with a transport error once a response body exceeds `bytes`.
        pub fn with_body_limit(mut self, bytes: u64) -> Self {
            self.body_limit = bytes;
            self
        }

        fn build(timeout: Option<Duration>) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self {
                agent,
                body_limit: u64::MAX,
            }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let HttpRequest {
                method,
                path,
                headers,
                body,
            } = request;

            let result = match method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(&path);
                    for (name, value) in &headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Delete => {
                    let mut builder = self.agent.delete(&path);
                    for (name, value) in &headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                    let mut builder = match method {
                        HttpMethod::Post => self.agent.post(&path),
                        HttpMethod::Put => self.agent.put(&path),
                        _ => self.agent.patch(&path),
                    };
                    for (name, value) in &headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    match body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(self.body_limit)
                .read_to_string()?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
