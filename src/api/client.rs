//! Backend REST API Client
//!
//! HTTP client for the inventory backend. Every request carries the session's
//! bearer token (when logged in) and an `X-Request-Id` for log correlation.
//! Failures are terminal: there is no retry, the caller surfaces them.

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, LoginResponse};

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Typed client for the backend REST API
///
/// Cloning is cheap and clones share the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(mut config: ApiClientConfig) -> ApiResult<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Attach (or with `None`, drop) the bearer token used for later requests
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    // ============================================
    // Authentication
    // ============================================

    /// `POST /auth/login`
    ///
    /// Does not store the token; [`crate::session::Session::login`] does that.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("auth/login", &body).await
    }

    // ============================================
    // Verbs
    // ============================================

    /// `GET` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.client.get(self.url(path));
        let response = self.send(builder, "GET", path).await?;
        decode(response, path).await
    }

    /// `GET` with a serialized query string
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.client.get(self.url(path)).query(query);
        let response = self.send(builder, "GET", path).await?;
        decode(response, path).await
    }

    /// `POST` a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(path)).json(body);
        let response = self.send(builder, "POST", path).await?;
        decode(response, path).await
    }

    /// `PUT` a JSON body; the response body (often empty) is discarded
    pub async fn put<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.client.put(self.url(path)).json(body);
        self.send(builder, "PUT", path).await?;
        Ok(())
    }

    /// `DELETE`; the response body is discarded
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let builder = self.client.delete(self.url(path));
        self.send(builder, "DELETE", path).await?;
        Ok(())
    }

    /// Attach headers, send, and turn non-success statuses into errors
    async fn send(&self, builder: RequestBuilder, method: &str, path: &str) -> ApiResult<Response> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = builder.header("X-Request-Id", &request_id);
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(request_id = %request_id, method, endpoint = %path, "API request");

        let response = builder.send().await.map_err(|e| {
            tracing::error!(request_id = %request_id, method, endpoint = %path, error = %e, "API request failed");
            ApiError::from_transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), path, &text);
        tracing::warn!(
            request_id = %request_id,
            method,
            endpoint = %path,
            status = status.as_u16(),
            error = %err,
            "API returned error status"
        );
        Err(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        endpoint: path.to_string(),
        error: e.to_string(),
    })
}
