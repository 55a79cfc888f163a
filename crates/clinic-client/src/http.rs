//! HTTP transport for the clinic API.

use crate::config::ClientConfig;
use crate::error::{ConfigError, FailureReason, RequestFailed};
use crate::{ConsultorioApi, Operation, Resource, Result, UsuarioApi};
use async_trait::async_trait;
use clinic_types::{Consultorio, Usuario};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// REST client for `/consultorios` and `/usuarios`.
///
/// Every trait method issues exactly one request. Responses are decoded as
/// sent by the server; nothing is normalized or re-validated here.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        let base_url = config.normalized_base_url()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn item_url(&self, resource: Resource, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, resource.path(), id)
    }

    /// Send the request and turn transport errors and non-2xx statuses into
    /// `RequestFailed`.
    async fn execute(
        &self,
        request: RequestBuilder,
        resource: Resource,
        operation: Operation,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(%resource, %operation, error = %e, "request did not complete");
            RequestFailed::new(resource, operation, FailureReason::Transport(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%resource, %operation, status = status.as_u16(), body = %body, "request rejected");
            return Err(RequestFailed::status(resource, operation, status.as_u16()));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        resource: Resource,
        operation: Operation,
    ) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            warn!(%resource, %operation, error = %e, "response body did not decode");
            RequestFailed::new(resource, operation, FailureReason::Decode(e.to_string()))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(resource.path());
        debug!(method = "GET", %url, ?query, "sending request");

        let request = self.client.get(&url).query(query);
        let response = self.execute(request, resource, Operation::List).await?;
        Self::decode(response, resource, Operation::List).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        resource: Resource,
        operation: Operation,
        body: &B,
    ) -> Result<T> {
        debug!(%method, %url, "sending request");

        let request = self.client.request(method, &url).json(body);
        let response = self.execute(request, resource, operation).await?;
        Self::decode(response, resource, operation).await
    }

    async fn delete_item(&self, resource: Resource, id: i64) -> Result<()> {
        let url = self.item_url(resource, id);
        debug!(method = "DELETE", %url, "sending request");

        let request = self.client.delete(&url);
        self.execute(request, resource, Operation::Delete).await?;
        Ok(())
    }
}

#[async_trait]
impl ConsultorioApi for HttpClient {
    async fn list_all(&self) -> Result<Vec<Consultorio>> {
        self.get_json(Resource::Consultorio, &[]).await
    }

    async fn create(&self, payload: &Consultorio) -> Result<Consultorio> {
        let url = self.url(Resource::Consultorio.path());
        self.send_json(
            Method::POST,
            url,
            Resource::Consultorio,
            Operation::Create,
            payload,
        )
        .await
    }

    async fn update(&self, id: i64, payload: &Consultorio) -> Result<Consultorio> {
        let url = self.item_url(Resource::Consultorio, id);
        self.send_json(
            Method::PUT,
            url,
            Resource::Consultorio,
            Operation::Update,
            payload,
        )
        .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.delete_item(Resource::Consultorio, id).await
    }
}

#[async_trait]
impl UsuarioApi for HttpClient {
    async fn list_all(&self) -> Result<Vec<Usuario>> {
        self.get_json(Resource::Usuario, &[]).await
    }

    async fn list_by_consultorio(&self, consultorio_id: i64) -> Result<Vec<Usuario>> {
        self.get_json(
            Resource::Usuario,
            &[("consultorioId", consultorio_id.to_string())],
        )
        .await
    }

    async fn create(&self, payload: &Usuario) -> Result<Usuario> {
        let url = self.url(Resource::Usuario.path());
        self.send_json(Method::POST, url, Resource::Usuario, Operation::Create, payload)
            .await
    }

    async fn update(&self, id: i64, payload: &Usuario) -> Result<Usuario> {
        let url = self.item_url(Resource::Usuario, id);
        self.send_json(Method::PUT, url, Resource::Usuario, Operation::Update, payload)
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.delete_item(Resource::Usuario, id).await
    }
}
