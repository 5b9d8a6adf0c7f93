//! Error types returned by every public operation of the client.

use thiserror::Error;

/// Status code reported for errors that did not come from an HTTP response
pub const DEFAULT_ERROR_CODE: u16 = 500;

#[derive(Error, Debug)]
pub enum Error {
    /// The client or a request descriptor was not usable, nothing was sent
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The token endpoint refused to hand out an access token
    #[error("{message}")]
    Auth { message: String, code: u16 },

    /// The request body could not be encoded for its content type.
    /// `payload` is the offending text, empty when the data never became text.
    #[error("Encoding error [{reason}] - Data: {payload}")]
    Encoding { reason: String, payload: String },

    /// No HTTP response was obtained
    #[error("{message}")]
    Transport { message: String },

    /// The API answered with a status code >= 400
    #[error("{message}")]
    Api { message: String, code: u16 },

    /// A response body did not match the type it was read into
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>, code: u16) -> Self {
        Self::Auth {
            message: message.into(),
            code,
        }
    }

    pub fn encoding(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    /// Encoding failure reported by serde_json, keeps its category and position
    pub fn json(err: &serde_json::Error, payload: impl Into<String>) -> Self {
        Self::encoding(format!("{:?}: {}", err.classify(), err), payload)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>, code: u16) -> Self {
        Self::Api {
            message: message.into(),
            code,
        }
    }

    /// HTTP status attached to the error, `500` when there is none
    pub fn code(&self) -> u16 {
        match self {
            Error::Auth { code, .. } | Error::Api { code, .. } => *code,
            _ => DEFAULT_ERROR_CODE,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = Error::config("No HTTP method specified");
        assert_eq!(
            err.to_string(),
            "Configuration error: No HTTP method specified"
        );

        let err = Error::api("not found - NF: E404", 404);
        assert_eq!(err.to_string(), "not found - NF: E404");

        let err = Error::encoding("EOF while parsing an object at line 1 column 1", "{");
        assert_eq!(
            err.to_string(),
            "Encoding error [EOF while parsing an object at line 1 column 1] - Data: {"
        );
    }

    #[test]
    fn test_json_error_keeps_category() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = Error::json(&source, "{").to_string();
        assert!(message.starts_with("Encoding error [Eof: EOF while parsing"));
        assert!(message.ends_with("] - Data: {"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(Error::auth("bad credentials", 401).code(), 401);
        assert_eq!(Error::api("not found", 404).code(), 404);
        assert_eq!(Error::transport("connection refused").code(), 500);
        assert_eq!(Error::config("missing uri").code(), 500);
    }
}
