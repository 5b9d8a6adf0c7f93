//! Turns an [`ApiRequest`] into exactly one HTTP call and classifies the answer.

use crate::error::{Error, Result};
use crate::form;
use crate::request::{ApiRequest, ApiResponse, Body, Method, ACCESS_TOKEN_HEADER};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use log::{debug, trace};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const ACCEPT: &str = "accept";
const AUTHORIZATION: &str = "authorization";
const CONTENT_TYPE: &str = "content-type";

pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RequestExecutor {
            transport,
            base_url,
        }
    }

    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let http_request = self.build(request)?;

        trace!("Sending {} '{}'", http_request.method, http_request.url);
        let response = self.transport.send(http_request).await?;

        classify(response)
    }

    /// Resolve everything that goes on the wire, without sending anything
    pub fn build(&self, request: ApiRequest) -> Result<HttpRequest> {
        let (method, uri) = validate(&request)?;

        let headers = normalize_headers(&request.headers);
        let content_type = headers
            .iter()
            .find(|(key, _)| key == CONTENT_TYPE)
            .map(|(_, value)| value.as_str())
            .unwrap_or(JSON_CONTENT_TYPE);

        let uri = append_query(uri, &request.query);
        let url = Url::parse(&format!("{}{}", self.base_url, uri))
            .map_err(|e| Error::config(format!("Invalid URL '{}{}': {}", self.base_url, uri, e)))?;

        let body = match request.body {
            Some(body) => Some(encode_body(body, content_type)?),
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Both the method and a non-empty uri are required before anything is sent
pub fn validate(request: &ApiRequest) -> Result<(Method, &str)> {
    let method = request
        .method
        .ok_or_else(|| Error::config("No HTTP method specified"))?;

    match request.uri.as_deref() {
        Some(uri) if !uri.is_empty() => Ok((method, uri)),
        _ => Err(Error::config("No URI specified")),
    }
}

/// Lower-cases keys and values, turns the `access_token` pseudo header into an
/// authorization header and makes sure accept and content-type are present once.
pub fn normalize_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    let mut normalized = vec![(ACCEPT.to_string(), JSON_CONTENT_TYPE.to_string())];

    for (key, value) in headers {
        let key = key.to_ascii_lowercase();
        let (key, value) = if key == ACCESS_TOKEN_HEADER {
            (AUTHORIZATION.to_string(), format!("bearer {}", value))
        } else {
            // Values are lower-cased as well, callers rely on it
            (key, value.to_ascii_lowercase())
        };

        if key == ACCEPT {
            continue;
        }

        match normalized.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => normalized.push((key, value)),
        }
    }

    if !normalized.iter().any(|(key, _)| key == CONTENT_TYPE) {
        normalized.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
    }

    normalized
}

pub fn append_query(uri: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return uri.to_string();
    }

    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}{}", uri, separator, form::encode_pairs(query))
}

pub fn encode_body(body: Body, content_type: &str) -> Result<String> {
    match body {
        Body::Raw(raw) if content_type == JSON_CONTENT_TYPE => {
            // Only checked, the caller's text is sent unchanged
            if let Err(e) = serde_json::from_str::<Value>(&raw) {
                return Err(Error::json(&e, raw));
            }
            Ok(raw)
        }
        Body::Structured(value) if content_type == JSON_CONTENT_TYPE => {
            serde_json::to_string(&value).map_err(|e| Error::json(&e, format!("{:?}", value)))
        }
        Body::Structured(value) if content_type == FORM_CONTENT_TYPE => form::encode_value(&value),
        Body::Raw(raw) => Ok(raw),
        Body::Structured(Value::String(text)) => Ok(text),
        Body::Structured(value) => Ok(value.to_string()),
    }
}

pub fn classify(response: HttpResponse) -> Result<ApiResponse> {
    let body = serde_json::from_str::<Value>(&response.body)
        .ok()
        .filter(|value| !value.is_null());

    if response.status >= 400 {
        let message = error_message(response.status, body.as_ref());
        debug!("Request failed with HTTP {}: {}", response.status, message);
        return Err(Error::api(message, response.status));
    }

    Ok(ApiResponse {
        status: response.status,
        body,
    })
}

/// `description`, extended with `codeResponse` and `error` when the API sends them
fn error_message(status: u16, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|body| body.get(name))
            .filter(|value| !value.is_null())
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    };

    match field("description") {
        Some(description) => match (field("codeResponse"), field("error")) {
            (Some(code_response), Some(error)) => {
                format!("{} - {}: {}", description, code_response, error)
            }
            _ => description,
        },
        None => format!("HTTP request failed with status {}", status),
    }
}
