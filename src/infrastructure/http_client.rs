use crate::application::services::{HttpClient, IterableService};
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::error::IterableError;
use crate::domain::value_objects::JsonBody;
use crate::infrastructure::config::Config;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::header::{HOST, HeaderName, HeaderValue};
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;
use tokio_native_tls::native_tls;
use tracing::debug;

/// Infrastructure implementation of HttpClient using Hyper
///
/// Each call opens one HTTP/1.1 connection (TLS for `https` URLs), sends a
/// single request and reads the whole body before returning.
pub struct HyperHttpClient {
    tls: TlsConnector,
}

impl HyperHttpClient {
    pub fn new() -> Result<Self, IterableError> {
        let connector = native_tls::TlsConnector::new()
            .map_err(|e| IterableError::Transport(format!("failed to set up TLS: {e}")))?;
        Ok(Self {
            tls: TlsConnector::from(connector),
        })
    }

    /// Creates a configured Iterable service using this client
    pub fn create_request_service(self, config: &Config) -> IterableService {
        IterableService::new(
            Box::new(self),
            config.base_url.clone(),
            config.api_key.clone(),
        )
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response, IterableError> {
        let (target, hyper_request) = RequestAdapter::to_hyper_request(request)?;
        let hyper_response = self.execute_http_request(&target, hyper_request).await?;
        ResponseAdapter::to_domain_response(hyper_response).await
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        target: &Uri,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, IterableError> {
        let (host, port, https) = HostAdapter::endpoint(target)?;

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| IterableError::Transport(format!("failed to connect to {host}:{port}: {e}")))?;

        if https {
            let stream = self
                .tls
                .connect(host, stream)
                .await
                .map_err(|e| IterableError::Transport(format!("TLS handshake with {host} failed: {e}")))?;
            Self::send_over(TokioIo::new(stream), request).await
        } else {
            Self::send_over(TokioIo::new(stream), request).await
        }
    }

    async fn send_over<S>(
        io: TokioIo<S>,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, IterableError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = http1::handshake(io)
            .await
            .map_err(|e| IterableError::Transport(format!("HTTP handshake failed: {e}")))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                debug!(error = %err, "connection closed with error");
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(|e| IterableError::Transport(format!("HTTP request execution failed: {e}")))
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    /// Returns the absolute target alongside an origin-form request for it.
    fn to_hyper_request(
        domain_request: Request,
    ) -> Result<(Uri, HyperRequest<Full<Bytes>>), IterableError> {
        let target = domain_request.url.0.clone();
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let path = target
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();
        let body = BodyAdapter::to_hyper_body(&domain_request.body);

        let mut builder = HyperRequest::builder()
            .method(method)
            .uri(path)
            .header(HOST, HostAdapter::host_header(&target)?);

        for (key, value) in &domain_request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| IterableError::Transport(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| IterableError::Transport(format!("invalid value for header '{key}': {e}")))?;
            builder = builder.header(name, value);
        }

        let request = builder
            .body(body)
            .map_err(|e| IterableError::Transport(format!("Failed to build HTTP request: {e}")))?;
        Ok((target, request))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
    ) -> Result<Response, IterableError> {
        let status = hyper_response.status();
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(Response { status, body })
    }

    async fn extract_response_body(
        response: hyper::Response<Incoming>,
    ) -> Result<Bytes, IterableError> {
        Ok(response
            .into_body()
            .collect()
            .await
            .map_err(|e| IterableError::Transport(format!("Failed to read response body: {e}")))?
            .to_bytes())
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Delete => Method::DELETE,
        }
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<JsonBody>) -> Full<Bytes> {
        match domain_body {
            Some(json_body) => Full::new(Bytes::from(json_body.0.clone())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for the target host: connect endpoint and `Host` header
struct HostAdapter;

impl HostAdapter {
    /// Host to connect to (IPv6 brackets stripped), port, and whether TLS is used.
    fn endpoint(target: &Uri) -> Result<(&str, u16, bool), IterableError> {
        let host = target
            .host()
            .ok_or_else(|| IterableError::InvalidUrl(format!("{target}: missing host")))?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let https = target.scheme_str() == Some("https");
        let port = target.port_u16().unwrap_or(if https { 443 } else { 80 });
        Ok((host, port, https))
    }

    fn host_header(target: &Uri) -> Result<HeaderValue, IterableError> {
        let authority = target
            .authority()
            .ok_or_else(|| IterableError::InvalidUrl(format!("{target}: missing host")))?;
        HeaderValue::from_str(authority.as_str())
            .map_err(|e| IterableError::InvalidUrl(format!("{target}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Url;

    fn domain_request(url: &str, body: Option<&str>) -> Request {
        Request {
            method: DomainMethod::Post,
            url: Url::new(url).unwrap(),
            headers: vec![
                ("Api-Key".to_string(), "k".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: body.map(|b| JsonBody(b.to_string())),
        }
    }

    #[test]
    fn request_is_sent_in_origin_form_with_host() {
        let (target, request) = RequestAdapter::to_hyper_request(domain_request(
            "http://127.0.0.1:4010/api/users/update?x=1",
            Some("{}"),
        ))
        .unwrap();

        assert_eq!(target.port_u16(), Some(4010));
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri(), "/api/users/update?x=1");
        assert_eq!(request.headers()[HOST], "127.0.0.1:4010");
        assert_eq!(request.headers()["api-key"], "k");
        assert_eq!(request.headers()["content-type"], "application/json");
    }

    #[test]
    fn endpoint_strips_ipv6_brackets() {
        let target: Uri = "http://[::1]:8080/api/lists".parse().unwrap();
        assert_eq!(HostAdapter::endpoint(&target).unwrap(), ("::1", 8080, false));

        let target: Uri = "https://api.iterable.com/api/lists".parse().unwrap();
        assert_eq!(
            HostAdapter::endpoint(&target).unwrap(),
            ("api.iterable.com", 443, true)
        );
    }

    #[test]
    fn header_values_are_validated() {
        let mut request = domain_request("https://api.iterable.com/api/lists", None);
        request.headers.push(("Api-Key".to_string(), "bad\nvalue".to_string()));
        assert!(RequestAdapter::to_hyper_request(request).is_err());
    }
}
