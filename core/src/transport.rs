//! Executes `HttpRequest`s for the stateful layers (controllers, contexts).
//!
//! The build/parse clients never do I/O; anything that needs a full
//! round-trip takes a `Transport`. `UreqTransport` is the blocking HTTP
//! implementation behind the default `ureq` feature.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Perform the round-trip. Only failures to get *any* response are
    /// errors here; 4xx/5xx come back as data for the parser.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::*;
    use crate::http::HttpMethod;

    /// Blocking transport backed by a shared `ureq::Agent`.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            // Status codes are interpreted by the client, not by ureq.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        #[tracing::instrument(level = "debug", skip_all, fields(method = %request.method, path = %request.path))]
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let HttpRequest {
                method,
                path,
                headers,
                body,
            } = request;

            let result = match (method, body) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&path), &headers).call(),
                (HttpMethod::Delete, _) => with_headers(self.agent.delete(&path), &headers).call(),
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(&path), &headers).send(body.as_bytes()),
                (HttpMethod::Post, None) => with_headers(self.agent.post(&path), &headers).send_empty(),
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(&path), &headers).send(body.as_bytes()),
                (HttpMethod::Put, None) => with_headers(self.agent.put(&path), &headers).send_empty(),
                (HttpMethod::Patch, Some(body)) => {
                    with_headers(self.agent.patch(&path), &headers).send(body.as_bytes())
                }
                (HttpMethod::Patch, None) => with_headers(self.agent.patch(&path), &headers).send_empty(),
            };

            let mut response = result.map_err(|e| {
                tracing::warn!(error = %e, "transport failure");
                ApiError::Transport(e.to_string())
            })?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            tracing::debug!(status, "response received");
            Ok(HttpResponse { status, headers, body })
        }
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}
