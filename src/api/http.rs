use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{ApiConfig, ApiResult, AuthApi, Credentials, LoginResponse, ResourceApi, routes};
use crate::core::{EntityId, RequestFailure, Result, SyncError};
use crate::model::{Entity, EntityPatch};

/// REST transport for the dashboard API.
///
/// One client serves every entity kind; the route is chosen from the entity's
/// kind. The bearer token can be swapped at runtime after login or logout.
pub struct HttpApi {
    config: ApiConfig,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| SyncError::Config(format!("failed to build HTTP client: {}", err)))?;

        let token = RwLock::new(config.token.clone());
        Ok(Self {
            config,
            client,
            token,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<reqwest::Response> {
        let url = self.config.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(transport_failure)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        warn!("{} {} failed with status {}", method, url, status);
        Err(status_failure(status, &text))
    }

    async fn fetch<R: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<R> {
        let response = self.execute(method, path, body).await?;
        response
            .json::<R>()
            .await
            .map_err(|err| RequestFailure::new(format!("invalid response body: {}", err)))
    }
}

fn transport_failure(err: reqwest::Error) -> RequestFailure {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };
    let failure = RequestFailure::new(message);
    match err.status() {
        Some(status) => failure.with_status(status.as_u16()),
        None => failure,
    }
}

/// Uses the server's `message` field when the body is JSON carrying one.
fn status_failure(status: StatusCode, body: &str) -> RequestFailure {
    let detail = serde_json::from_str::<Value>(body).ok();
    let message = detail
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
        });

    let failure = RequestFailure::new(message).with_status(status.as_u16());
    match detail {
        Some(detail) => failure.with_detail(detail),
        None => failure,
    }
}

fn encode<B: serde::Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body)
        .map_err(|err| RequestFailure::new(format!("failed to encode request body: {}", err)))
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for HttpApi {
    async fn list_all(&self) -> ApiResult<Vec<T>> {
        self.fetch(Method::GET, routes::list_all(T::KIND), None).await
    }

    async fn list_by_parent(&self, parent_id: &EntityId) -> ApiResult<Vec<T>> {
        let path = routes::list_by_parent(T::KIND, parent_id).ok_or_else(|| {
            RequestFailure::new(format!("{} has no parent listing", T::KIND.collection_name()))
        })?;
        self.fetch(Method::GET, &path, None).await
    }

    async fn get_by_id(&self, id: &EntityId) -> ApiResult<T> {
        self.fetch(Method::GET, &routes::item(T::KIND, id), None).await
    }

    async fn create(&self, draft: &T::Draft) -> ApiResult<T> {
        let body = encode(draft)?;
        self.fetch(Method::POST, routes::create(T::KIND), Some(body)).await
    }

    async fn update(&self, id: &EntityId, patch: &EntityPatch) -> ApiResult<EntityPatch> {
        let response = self
            .execute(Method::PATCH, &routes::item(T::KIND, id), Some(patch.clone().into_value()))
            .await?;
        let text = response
            .text()
            .await
            .map_err(|err| RequestFailure::new(format!("invalid response body: {}", err)))?;

        // Servers that answer with an empty or non-object body confirm the
        // request as sent.
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(fields)) => Ok(EntityPatch::from(fields)),
            _ => Ok(patch.clone()),
        }
    }

    async fn delete(&self, id: &EntityId) -> ApiResult<()> {
        self.execute(Method::DELETE, &routes::item(T::KIND, id), None)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let body = encode(credentials)?;
        self.fetch(Method::POST, routes::LOGIN, Some(body)).await
    }
}
