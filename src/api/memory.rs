use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ApiResult, AuthApi, Credentials, LoginResponse, ResourceApi};
use crate::core::{EntityId, EntityKind, RequestFailure};
use crate::model::{Entity, EntityPatch, User};

/// In-process backend implementing the API for every entity kind.
///
/// Entities are kept as JSON rows per kind, in insertion order, and ids are
/// assigned on create. Failures can be queued per kind to exercise rejection
/// paths.
#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<EntityKind, Vec<Value>>,
    accounts: HashMap<String, Account>,
    queued_failures: HashMap<EntityKind, Vec<RequestFailure>>,
}

struct Account {
    user_id: EntityId,
    password: String,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts entities as if they already existed on the server.
    pub async fn seed<T: Entity>(&self, entities: Vec<T>) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        for entity in entities {
            let row = to_row(&entity)?;
            state.tables.entry(T::KIND).or_default().push(row);
        }
        Ok(())
    }

    /// Registers a login for an existing or seeded user.
    pub async fn add_account(&self, user: &User, password: &str) {
        let mut state = self.state.lock().await;
        state.accounts.insert(
            user.email.to_ascii_lowercase(),
            Account {
                user_id: user.id.clone(),
                password: password.to_string(),
            },
        );
    }

    /// The next request for `kind` fails with `failure`.
    pub async fn fail_next(&self, kind: EntityKind, failure: RequestFailure) {
        let mut state = self.state.lock().await;
        state.queued_failures.entry(kind).or_default().push(failure);
    }

    pub async fn count(&self, kind: EntityKind) -> usize {
        let state = self.state.lock().await;
        state.tables.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

impl MemoryState {
    fn take_failure(&mut self, kind: EntityKind) -> ApiResult<()> {
        match self.queued_failures.get_mut(&kind) {
            Some(queue) if !queue.is_empty() => Err(queue.remove(0)),
            _ => Ok(()),
        }
    }

    fn rows<T: Entity>(&self) -> ApiResult<Vec<T>> {
        self.tables
            .get(&T::KIND)
            .map(|rows| rows.iter().map(from_row::<T>).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn position<T: Entity>(&self, id: &EntityId) -> ApiResult<Option<usize>> {
        let rows = self.rows::<T>()?;
        Ok(rows.iter().position(|row| row.id() == id))
    }
}

fn to_row<T: Entity>(entity: &T) -> ApiResult<Value> {
    serde_json::to_value(entity)
        .map_err(|err| RequestFailure::new(format!("failed to encode {}: {}", T::KIND, err)))
}

fn from_row<T: Entity>(row: &Value) -> ApiResult<T> {
    serde_json::from_value(row.clone())
        .map_err(|err| RequestFailure::new(format!("corrupt {} row: {}", T::KIND, err)))
}

fn not_found(kind: EntityKind, id: &EntityId) -> RequestFailure {
    RequestFailure::new(format!("{} '{}' not found", kind, id)).with_status(404)
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for MemoryApi {
    async fn list_all(&self) -> ApiResult<Vec<T>> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;
        state.rows::<T>()
    }

    async fn list_by_parent(&self, parent_id: &EntityId) -> ApiResult<Vec<T>> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;
        let rows = state.rows::<T>()?;
        Ok(rows
            .into_iter()
            .filter(|row| row.parent_id() == Some(parent_id))
            .collect())
    }

    async fn get_by_id(&self, id: &EntityId) -> ApiResult<T> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;
        state
            .rows::<T>()?
            .into_iter()
            .find(|row| row.id() == id)
            .ok_or_else(|| not_found(T::KIND, id))
    }

    async fn create(&self, draft: &T::Draft) -> ApiResult<T> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;

        let id = EntityId::generate();
        let entity = T::from_draft(id.clone(), draft.clone());
        let row = to_row(&entity)?;

        if T::KIND == EntityKind::User {
            let draft = serde_json::to_value(draft).unwrap_or(Value::Null);
            if let (Some(email), Some(password)) = (
                draft.get("email").and_then(Value::as_str),
                draft.get("password").and_then(Value::as_str),
            ) {
                state.accounts.insert(
                    email.to_ascii_lowercase(),
                    Account {
                        user_id: id,
                        password: password.to_string(),
                    },
                );
            }
        }

        state.tables.entry(T::KIND).or_default().push(row);
        Ok(entity)
    }

    async fn update(&self, id: &EntityId, patch: &EntityPatch) -> ApiResult<EntityPatch> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;

        let index = state
            .position::<T>(id)?
            .ok_or_else(|| not_found(T::KIND, id))?;
        let rows = state.tables.entry(T::KIND).or_default();
        let existing: T = from_row(&rows[index])?;
        let updated = patch
            .apply_to(&existing)
            .map_err(|err| RequestFailure::new(err.to_string()).with_status(400))?;
        rows[index] = to_row(&updated)?;

        EntityPatch::from_entity(&updated).map_err(RequestFailure::from)
    }

    async fn delete(&self, id: &EntityId) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.take_failure(T::KIND)?;

        let index = state
            .position::<T>(id)?
            .ok_or_else(|| not_found(T::KIND, id))?;
        state.tables.entry(T::KIND).or_default().remove(index);
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MemoryApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let state = self.state.lock().await;
        let invalid = || RequestFailure::new("invalid email or password").with_status(401);

        let account = state
            .accounts
            .get(&credentials.email.to_ascii_lowercase())
            .ok_or_else(invalid)?;
        if account.password != credentials.password {
            return Err(invalid());
        }

        let user = state
            .rows::<User>()?
            .into_iter()
            .find(|user| user.id == account.user_id)
            .ok_or_else(invalid)?;

        Ok(LoginResponse {
            access_token: Uuid::new_v4().to_string(),
            payload: user,
        })
    }
}
