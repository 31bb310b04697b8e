// ============================================================================
// API Collaborator
// ============================================================================
//
// The store never talks to a transport directly. Each entity kind is served
// by a `ResourceApi` implementation returning either the entity shape or a
// `RequestFailure`; authentication goes through `AuthApi`.
//
// ============================================================================

pub mod config;
pub mod http;
pub mod memory;
pub mod routes;

pub use config::ApiConfig;
pub use http::HttpApi;
pub use memory::MemoryApi;

use crate::core::{EntityId, RequestFailure};
use crate::model::{Entity, EntityPatch, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ApiResult<T> = std::result::Result<T, RequestFailure>;

/// Remote operations available for one entity kind.
#[async_trait]
pub trait ResourceApi<T: Entity>: Send + Sync {
    async fn list_all(&self) -> ApiResult<Vec<T>>;

    async fn list_by_parent(&self, parent_id: &EntityId) -> ApiResult<Vec<T>>;

    async fn get_by_id(&self, id: &EntityId) -> ApiResult<T>;

    async fn create(&self, draft: &T::Draft) -> ApiResult<T>;

    /// Returns the fields the server reports as changed; callers merge them
    /// shallowly into their local copy.
    async fn update(&self, id: &EntityId, patch: &EntityPatch) -> ApiResult<EntityPatch>;

    async fn delete(&self, id: &EntityId) -> ApiResult<()>;
}

/// Login form payload.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login: the bearer token and the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub payload: User,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
}
