use crate::error::{Error, Result};
use crate::executor::{RequestExecutor, FORM_CONTENT_TYPE};
use crate::request::{ApiRequest, Method};
use log::{debug, trace};
use oauth2::{AccessToken, ClientId, ClientSecret};
use serde_json::json;
use tokio::sync::OnceCell;

pub const TOKEN_URI: &str = "/1.1/TokenEndpoint";

/// Exchanges the client credentials for a bearer token and keeps it.
///
/// The token is fetched at most once: the first caller performs the exchange, concurrent
/// callers wait for it, later callers get the cached token. There is no expiry tracking.
pub struct TokenProvider {
    client_id: ClientId,
    secret_id: ClientSecret,
    token: OnceCell<AccessToken>,
}

impl TokenProvider {
    pub fn new(client_id: ClientId, secret_id: ClientSecret) -> Self {
        TokenProvider {
            client_id,
            secret_id,
            token: OnceCell::new(),
        }
    }

    pub async fn access_token(&self, executor: &RequestExecutor) -> Result<&AccessToken> {
        self.token
            .get_or_try_init(|| self.fetch(executor))
            .await
    }

    /// Forget the cached token, the next call exchanges the credentials again
    pub fn reset(&mut self) {
        if self.token.take().is_some() {
            debug!("Discarded cached access token");
        }
    }

    async fn fetch(&self, executor: &RequestExecutor) -> Result<AccessToken> {
        trace!("Exchanging client credentials at '{}'", TOKEN_URI);

        let request = ApiRequest::new(Method::Post, TOKEN_URI)
            .header("content-type", FORM_CONTENT_TYPE)
            .body(json!({
                "client_id": self.client_id.as_str(),
                "secret_id": self.secret_id.secret(),
                "grant_type": "client_credentials",
            }))
            .authenticate(false);

        let response = match executor.execute(request).await {
            Ok(response) => response,
            Err(Error::Api { message, code }) => return Err(Error::auth(message, code)),
            Err(e) => return Err(e),
        };

        if response.status != 200 {
            let message = response
                .body
                .as_ref()
                .and_then(|body| body.get("description"))
                .and_then(|description| description.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Unexpected status {} from token endpoint", response.status)
                });
            return Err(Error::auth(message, response.status));
        }

        let access_token = response
            .body
            .as_ref()
            .and_then(|body| body.get("access_token"))
            .and_then(|token| token.as_str())
            .ok_or_else(|| Error::auth("Token response is missing access_token", response.status))?;

        debug!("Successfully exchanged client credentials for a bearer token");
        Ok(AccessToken::new(access_token.to_string()))
    }
}
