//! HTTP client for talking to a sibling service.

use reqwest::Method;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Any failure reaching the service or reading its answer. The downstream
    /// status and body are intentionally not carried.
    #[error("Error communicating with {service}")]
    Unavailable { service: String },
}

/// Client bound to one service's base URL.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    base_url: String,
    service_name: String,
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, service_name)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            service_name: service_name.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The underlying HTTP client, for callers that need the raw response.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolves `endpoint` against the base URL.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Issues one request and returns the parsed JSON body of a 2xx answer.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ServiceError> {
        let url = self.url(endpoint);
        let mut builder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result = async {
            builder
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        }
        .await;

        result.map_err(|e| {
            tracing::error!(
                service = %self.service_name,
                method = %method,
                url = %url,
                error = %e,
                "Error communicating with {}",
                self.service_name
            );
            ServiceError::Unavailable {
                service: self.service_name.clone(),
            }
        })
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ServiceError> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ServiceError> {
        self.request(Method::POST, endpoint, Some(body)).await
    }
}
