use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::warn;

use super::SyncOperation;
use crate::api::{ApiResult, ResourceApi};
use crate::collection::{OperationOutput, SettleOutcome};
use crate::core::{EntityId, EntityKind, RequestFailure};
use crate::lifecycle::RequestTicket;
use crate::model::{Activity, Entity, EntityPatch, Metric, Project, Report, User};
use crate::store::{StoreHandle, Stored};

/// What a dispatched operation did to its collection.
///
/// Failures are recorded on the collection; the report only lets the call
/// site react (for example with a notification).
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub kind: EntityKind,
    pub ticket: RequestTicket,
    pub outcome: SettleOutcome,
}

impl OperationReport {
    pub fn is_fulfilled(&self) -> bool {
        self.outcome.is_fulfilled()
    }

    pub fn failure(&self) -> Option<&RequestFailure> {
        self.outcome.failure()
    }

    /// `Err` for a rejected operation. A discarded stale result counts as done.
    pub fn into_result(self) -> Result<(), RequestFailure> {
        match self.outcome {
            SettleOutcome::Rejected(failure) => Err(failure),
            SettleOutcome::Fulfilled | SettleOutcome::Discarded => Ok(()),
        }
    }
}

/// Runs `op` against the collection of `T` in `store`.
///
/// The collection turns `pending` before the request is issued and the lock is
/// released while the request is in flight. The request and its settlement run
/// on a spawned task, so the collection settles even if the returned future is
/// dropped, for example by a timeout.
pub async fn dispatch<T, A>(store: &StoreHandle, api: Arc<A>, op: SyncOperation<T>) -> OperationReport
where
    T: Stored,
    A: ResourceApi<T> + ?Sized + 'static,
{
    let ticket = store
        .update(|store| store.collection_mut::<T>().begin(op.kind()))
        .await;

    let settling = store.clone();
    let task = tokio::spawn(async move {
        let result = AssertUnwindSafe(op.perform(api.as_ref()))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(RequestFailure::new("request panicked")));
        settle_ticket::<T>(&settling, ticket, result).await
    });

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(seq = %ticket.seq, error = %err, "request task ended before settling");
            settle_ticket::<T>(store, ticket, Err(RequestFailure::new("request aborted"))).await
        }
    };

    OperationReport {
        kind: T::KIND,
        ticket,
        outcome,
    }
}

async fn settle_ticket<T: Stored>(
    store: &StoreHandle,
    ticket: RequestTicket,
    result: ApiResult<OperationOutput<T>>,
) -> SettleOutcome {
    store
        .update(|store| {
            let ordering = store.policy().ordering;
            store.collection_mut::<T>().settle(ticket, result, ordering)
        })
        .await
}

/// Store handle paired with the API collaborator, for call sites that issue
/// many operations.
///
/// # Examples
///
/// ```
/// use impactdesk::model::NewProject;
/// use impactdesk::{MemoryApi, Project, StoreHandle, SyncClient};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let client = SyncClient::new(StoreHandle::default(), Arc::new(MemoryApi::new()));
///
/// client
///     .create::<Project>(NewProject::named("Clean Water"))
///     .await
///     .into_result()
///     .unwrap();
///
/// let projects = client.store().snapshot::<Project>().await;
/// assert_eq!(projects.items()[0].project_name, "Clean Water");
/// # });
/// ```
pub struct SyncClient<A: ?Sized> {
    store: StoreHandle,
    api: Arc<A>,
}

impl<A: ?Sized> Clone for SyncClient<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: ?Sized + Send + Sync + 'static> SyncClient<A> {
    pub fn new(store: StoreHandle, api: Arc<A>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub async fn run<T>(&self, op: SyncOperation<T>) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        dispatch(&self.store, Arc::clone(&self.api), op).await
    }

    pub async fn fetch_all<T>(&self) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::FetchAll).await
    }

    pub async fn fetch_by_parent<T>(&self, parent_id: EntityId) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::FetchByParent(parent_id)).await
    }

    pub async fn fetch_by_id<T>(&self, id: EntityId) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::FetchById(id)).await
    }

    pub async fn create<T>(&self, draft: <T as Entity>::Draft) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::Create(draft)).await
    }

    pub async fn update<T>(&self, id: EntityId, patch: EntityPatch) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::Update { id, patch }).await
    }

    pub async fn delete<T>(&self, id: EntityId) -> OperationReport
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        self.run(SyncOperation::<T>::Delete(id)).await
    }
}

impl<A> SyncClient<A>
where
    A: ResourceApi<Project>
        + ResourceApi<Activity>
        + ResourceApi<Metric>
        + ResourceApi<Report>
        + ResourceApi<User>
        + ?Sized
        + 'static,
{
    /// Fetches every collection at once, as the admin dashboard does on load.
    /// Reports come back in store order: projects, activities, metrics,
    /// reports, users.
    pub async fn refresh_all(&self) -> Vec<OperationReport> {
        let (projects, activities, metrics, reports, users) = futures::join!(
            self.fetch_all::<Project>(),
            self.fetch_all::<Activity>(),
            self.fetch_all::<Metric>(),
            self.fetch_all::<Report>(),
            self.fetch_all::<User>(),
        );
        vec![projects, activities, metrics, reports, users]
    }
}
