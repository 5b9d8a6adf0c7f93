//! The HTTP capability the client sends its requests through.
//!
//! [`ReqwestTransport`] is used by default. Anything implementing [`Transport`] can be
//! handed to [`XubioClient::with_transport`](crate::XubioClient::with_transport).

use crate::error::{Error, Result};
use crate::request::Method;
use async_trait::async_trait;
use log::trace;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

/// A fully resolved request, ready to go on the wire
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of a header, keys are compared case-insensitively
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request once. Returning an error means no response was received,
    /// every status code is a response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("xubio-client-rs/", env!("CARGO_PKG_VERSION")))
            // A redirect is answered back to the caller, never followed
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::config(format!("Failed to build http client: {}", e)))?;

        Ok(Self::with_client(http_client))
    }

    /// Reuse an existing reqwest client (proxies, timeouts, custom roots, ...)
    pub fn with_client(http_client: Client) -> Self {
        ReqwestTransport { http_client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("Invalid value for header '{}': {}", key, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let headers = to_header_map(&request.headers)?;

        let mut builder = self
            .http_client
            .request(to_reqwest_method(request.method), request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status().as_u16();
        trace!("Received HTTP {} from '{}'", status, response.url());

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_map() {
        let map = to_header_map(&[
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), "bearer tok1".to_string()),
        ])
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Authorization").unwrap(), "bearer tok1");
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let result = to_header_map(&[("bad header".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = to_header_map(&[("x-note".to_string(), "line\nbreak".to_string())]);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_http_request_header_lookup() {
        let request = HttpRequest {
            method: Method::Get,
            url: Url::parse("https://xubio.com/API/1.1/clienteBean").unwrap(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }
}
