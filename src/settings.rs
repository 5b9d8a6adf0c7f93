use crate::error::{Error, Result};
use oauth2::{ClientId, ClientSecret};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://xubio.com/API";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub client_id: ClientId,
    pub secret_id: ClientSecret,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Settings {
    pub fn new(client_id: impl Into<String>, secret_id: impl Into<String>) -> Self {
        Settings {
            client_id: ClientId::new(client_id.into()),
            secret_id: ClientSecret::new(secret_id.into()),
            base_url: default_base_url(),
        }
    }

    /// Point the client at another API root, e.g. a mock server in tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() || self.secret_id.secret().is_empty() {
            return Err(Error::config(
                "Invalid arguments. Use CLIENT_ID and SECRET_ID",
            ));
        }

        if self.base_url.is_empty() {
            return Err(Error::config("No base URL specified"));
        }

        Ok(())
    }
}
