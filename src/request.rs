use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Header key that is rewritten into an `authorization: bearer ...` header
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Structured data, encoded according to the request content type
    Structured(Value),
    /// Text that is sent as-is (json bodies are still validated)
    Raw(String),
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Structured(value)
    }
}

impl From<String> for Body {
    fn from(raw: String) -> Self {
        Body::Raw(raw)
    }
}

impl From<&str> for Body {
    fn from(raw: &str) -> Self {
        Body::Raw(raw.to_string())
    }
}

/// Description of a single call against the API.
///
/// `uri` is relative to the configured base url, e.g. `/1.1/clienteBean`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub uri: Option<String>,
    pub method: Option<Method>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    /// When false the client does not add its access token
    pub authenticate: bool,
}

impl Default for ApiRequest {
    fn default() -> Self {
        ApiRequest {
            uri: None,
            method: None,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            authenticate: true,
        }
    }
}

impl ApiRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        ApiRequest {
            uri: Some(uri.into()),
            method: Some(method),
            ..ApiRequest::default()
        }
    }

    /// A request without a method, which is filled in by the generic client calls
    pub fn to(uri: impl Into<String>) -> Self {
        ApiRequest {
            uri: Some(uri.into()),
            ..ApiRequest::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Use any serializable value as structured body
    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> Result<Self> {
        let value = serde_json::to_value(data)
            .map_err(|e| Error::encoding(e.to_string(), String::new()))?;
        Ok(self.body(Body::Structured(value)))
    }

    pub fn authenticate(mut self, authenticate: bool) -> Self {
        self.authenticate = authenticate;
        self
    }
}

/// Outcome of a successful call
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the body was empty or not valid json
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn json<R>(&self) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = self.body.clone().unwrap_or(Value::Null);
        serde_json::from_value(body).map_err(|e| Error::Decode {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new(Method::Post, "/1.1/clienteBean")
            .header("Content-Type", "application/json")
            .query("page", "1")
            .body(json!({"nombre": "ACME"}))
            .authenticate(false);

        assert_eq!(request.uri.as_deref(), Some("/1.1/clienteBean"));
        assert_eq!(request.method, Some(Method::Post));
        assert_eq!(
            request.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(request.query, vec![("page".to_string(), "1".to_string())]);
        assert_eq!(
            request.body,
            Some(Body::Structured(json!({"nombre": "ACME"})))
        );
        assert!(!request.authenticate);
    }

    #[test]
    fn test_default_request_is_authenticated_and_empty() {
        let request = ApiRequest::default();
        assert!(request.authenticate);
        assert!(request.uri.is_none());
        assert!(request.method.is_none());
    }

    #[test]
    fn test_json_body_from_struct() {
        #[derive(Serialize)]
        struct Client {
            nombre: String,
            cuit: u64,
        }

        let request = ApiRequest::to("/1.1/clienteBean")
            .json(&Client {
                nombre: "ACME".to_string(),
                cuit: 30_712_345_678,
            })
            .unwrap();

        assert_eq!(
            request.body,
            Some(Body::Structured(
                json!({"nombre": "ACME", "cuit": 30_712_345_678u64})
            ))
        );
    }

    #[test]
    fn test_unserializable_body() {
        let mut data = std::collections::BTreeMap::new();
        data.insert((1, 2), "tuple keys have no json form");

        match ApiRequest::to("/1.1/clienteBean").json(&data) {
            Err(Error::Encoding { reason, payload }) => {
                assert!(reason.contains("key must be a string"));
                assert_eq!(payload, "");
            }
            other => panic!("expected an encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_response_json() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Product {
            codigo: String,
        }

        let response = ApiResponse {
            status: 200,
            body: Some(json!([{"codigo": "P1"}])),
        };
        let products: Vec<Product> = response.json().unwrap();
        assert_eq!(
            products,
            vec![Product {
                codigo: "P1".to_string()
            }]
        );

        let empty = ApiResponse {
            status: 204,
            body: None,
        };
        assert!(matches!(
            empty.json::<Vec<Product>>(),
            Err(Error::Decode { .. })
        ));
        assert_eq!(empty.json::<Option<Product>>().unwrap(), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Get.as_str(), "GET");
    }
}
