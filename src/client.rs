use crate::error::Result;
use crate::executor::{self, RequestExecutor};
use crate::request::{ApiRequest, ApiResponse, Method, ACCESS_TOKEN_HEADER};
use crate::settings::Settings;
use crate::token::TokenProvider;
use crate::transport::{ReqwestTransport, Transport};
use log::trace;
use serde::Serialize;
use std::sync::Arc;

const CLIENT_URI: &str = "/1.1/clienteBean";
const SALES_INVOICE_URI: &str = "/1.1/comprobanteVentaBean";
const INVOICE_URI: &str = "/1.1/facturar";
const PRODUCT_URI: &str = "/1.1/ProductoVentaBean";

pub struct XubioClient {
    executor: RequestExecutor,
    token: TokenProvider,
}

impl XubioClient {
    /// Create a client that talks to the API over https.
    /// No request is made until the first operation is called.
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(settings, Arc::new(transport))
    }

    pub fn with_transport(settings: Settings, transport: Arc<dyn Transport>) -> Result<Self> {
        settings.validate()?;

        trace!("Creating client for '{}'", settings.base_url);
        Ok(XubioClient {
            executor: RequestExecutor::new(transport, settings.base_url),
            token: TokenProvider::new(settings.client_id, settings.secret_id),
        })
    }

    /// Bearer token used for authenticated calls, exchanged on first use and then reused
    pub async fn get_access_token(&self) -> Result<String> {
        let token = self.token.access_token(&self.executor).await?;
        Ok(token.secret().clone())
    }

    /// Drop the cached token, e.g. after the API reported it as expired
    pub fn reset_access_token(&mut self) {
        self.token.reset();
    }

    pub async fn get_client(&self, id: Option<&str>) -> Result<ApiResponse> {
        self.execute(ApiRequest::new(Method::Get, resource_uri(CLIENT_URI, id)))
            .await
    }

    pub async fn create_client<T>(&self, client: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.execute(ApiRequest::new(Method::Post, CLIENT_URI).json(client)?)
            .await
    }

    pub async fn update_client<T>(&self, id: &str, client: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        let uri = resource_uri(CLIENT_URI, Some(id));
        self.execute(ApiRequest::new(Method::Put, uri).json(client)?)
            .await
    }

    pub async fn delete_client(&self, id: &str) -> Result<ApiResponse> {
        let uri = resource_uri(CLIENT_URI, Some(id));
        self.execute(ApiRequest::new(Method::Delete, uri)).await
    }

    pub async fn get_invoice(&self, id: Option<&str>) -> Result<ApiResponse> {
        let uri = resource_uri(SALES_INVOICE_URI, id);
        self.execute(ApiRequest::new(Method::Get, uri)).await
    }

    /// Issue an invoice through the invoicing endpoint
    pub async fn create_invoice<T>(&self, invoice: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.execute(ApiRequest::new(Method::Post, INVOICE_URI).json(invoice)?)
            .await
    }

    /// Store a sales voucher without going through the invoicing endpoint
    pub async fn create_sales_invoice<T>(&self, invoice: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        self.execute(ApiRequest::new(Method::Post, SALES_INVOICE_URI).json(invoice)?)
            .await
    }

    pub async fn update_invoice<T>(&self, id: &str, invoice: &T) -> Result<ApiResponse>
    where
        T: Serialize + ?Sized,
    {
        let uri = resource_uri(SALES_INVOICE_URI, Some(id));
        self.execute(ApiRequest::new(Method::Put, uri).json(invoice)?)
            .await
    }

    pub async fn delete_invoice(&self, id: &str) -> Result<ApiResponse> {
        let uri = resource_uri(SALES_INVOICE_URI, Some(id));
        self.execute(ApiRequest::new(Method::Delete, uri)).await
    }

    pub async fn get_products(&self) -> Result<ApiResponse> {
        self.execute(ApiRequest::new(Method::Get, PRODUCT_URI)).await
    }

    pub async fn get(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.execute(request.method(Method::Get)).await
    }

    pub async fn post(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.execute(request.method(Method::Post)).await
    }

    pub async fn put(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.execute(request.method(Method::Put)).await
    }

    pub async fn delete(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.execute(request.method(Method::Delete)).await
    }

    /// Run a request as described, adding the access token unless
    /// [`ApiRequest::authenticate`] was turned off.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        // Reject unusable requests before the token exchange can hit the network
        executor::validate(&request)?;

        let request = if request.authenticate {
            let token = self.token.access_token(&self.executor).await?;
            request.header(ACCESS_TOKEN_HEADER, token.secret().as_str())
        } else {
            request
        };

        self.executor.execute(request).await
    }
}

fn resource_uri(base: &str, id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("{}/{}", base, id),
        _ => base.to_string(),
    }
}
