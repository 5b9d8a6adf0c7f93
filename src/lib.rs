//! # Xubio Client
//! Client for the [Xubio](https://xubio.com) accounting REST API.
//! Authentication uses the oauth 2.0 client credentials the API hands out per company,
//! the bearer token is exchanged on first use and reused for the lifetime of the client.
//!
//! The client is based on the `Reqwest` library, any other http stack can be plugged in
//! by implementing [`Transport`].
//!
//! ## Usage
//! Add this library as a dependency to your project.
//! ```toml
//! [dependencies]
//! xubio_client = "0.1"
//! ```
//!
//! ## Example code
//! ```no_run
//!# async fn doc_test() -> anyhow::Result<()> {
//! use xubio_client::{ApiRequest, Settings, XubioClient};
//!
//! // Set up the client, nothing is sent yet
//! let client = XubioClient::new(Settings::new("xxxxxxxxxx", "xxxxxxxxxx"))?;
//!
//! // The first call exchanges the credentials for a bearer token
//! let response = client.get_client(Some("42")).await?;
//! println!("{:?}", response.body);
//!
//! // Resources without a dedicated method go through the generic calls
//! let response = client
//!     .get(ApiRequest::to("/1.1/listaDePrecioBean").query("activo", "1"))
//!     .await?;
//! println!("{}", response.status);
//!
//!# Ok(())
//!# }
//! ```
mod client;
mod error;
mod executor;
mod form;
mod request;
mod settings;
mod token;
mod transport;

pub use crate::client::XubioClient;
pub use crate::error::{Error, Result};
pub use crate::executor::{RequestExecutor, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use crate::request::{ApiRequest, ApiResponse, Body, Method, ACCESS_TOKEN_HEADER};
pub use crate::settings::{Settings, DEFAULT_BASE_URL};
pub use crate::token::TokenProvider;
pub use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
