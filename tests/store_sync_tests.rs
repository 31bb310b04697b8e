/// Store synchronization tests
///
/// Ordering and lifecycle behaviour of dispatched operations, with request
/// completion order chosen by the test.
/// Run with: cargo test --test store_sync_tests

use async_trait::async_trait;
use impactdesk::api::ApiResult;
use impactdesk::model::NewProject;
use impactdesk::sync::SettleOutcome;
use impactdesk::{
    EntityId, EntityPatch, MemoryApi, OrderingPolicy, Project, RequestFailure, RequestLifecycle,
    ResourceApi, StoreHandle, StorePolicy, SyncClient, SyncOperation, dispatch,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};

/// Project API whose list-all calls wait for a result handed in by the test.
struct GatedApi {
    gates: Mutex<VecDeque<oneshot::Receiver<ApiResult<Vec<Project>>>>>,
    started: AtomicUsize,
}

impl GatedApi {
    fn new(gates: Vec<oneshot::Receiver<ApiResult<Vec<Project>>>>) -> Self {
        Self {
            gates: Mutex::new(gates.into()),
            started: AtomicUsize::new(0),
        }
    }

    async fn wait_started(&self, count: usize) {
        while self.started.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }
}

fn unsupported<T>() -> ApiResult<T> {
    Err(RequestFailure::new("unsupported in gated api"))
}

#[async_trait]
impl ResourceApi<Project> for GatedApi {
    async fn list_all(&self) -> ApiResult<Vec<Project>> {
        let gate = self.gates.lock().await.pop_front();
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(RequestFailure::new("gate dropped"))),
            None => Err(RequestFailure::new("no gate left")),
        }
    }

    async fn list_by_parent(&self, _parent_id: &EntityId) -> ApiResult<Vec<Project>> {
        unsupported()
    }

    async fn get_by_id(&self, _id: &EntityId) -> ApiResult<Project> {
        unsupported()
    }

    async fn create(&self, _draft: &NewProject) -> ApiResult<Project> {
        unsupported()
    }

    async fn update(&self, _id: &EntityId, _patch: &EntityPatch) -> ApiResult<EntityPatch> {
        unsupported()
    }

    async fn delete(&self, _id: &EntityId) -> ApiResult<()> {
        unsupported()
    }
}

/// Project API whose list-all call panics.
struct PanickingApi;

#[async_trait]
impl ResourceApi<Project> for PanickingApi {
    async fn list_all(&self) -> ApiResult<Vec<Project>> {
        panic!("list handler blew up");
    }

    async fn list_by_parent(&self, _parent_id: &EntityId) -> ApiResult<Vec<Project>> {
        unsupported()
    }

    async fn get_by_id(&self, _id: &EntityId) -> ApiResult<Project> {
        unsupported()
    }

    async fn create(&self, _draft: &NewProject) -> ApiResult<Project> {
        unsupported()
    }

    async fn update(&self, _id: &EntityId, _patch: &EntityPatch) -> ApiResult<EntityPatch> {
        unsupported()
    }

    async fn delete(&self, _id: &EntityId) -> ApiResult<()> {
        unsupported()
    }
}

fn project(id: &str, name: &str) -> Project {
    use impactdesk::Entity;
    Project::from_draft(EntityId::from(id), NewProject::named(name))
}

fn spawn_fetch_all(
    store: &StoreHandle,
    api: &Arc<GatedApi>,
) -> tokio::task::JoinHandle<impactdesk::OperationReport> {
    let store = store.clone();
    let api = Arc::clone(api);
    tokio::spawn(async move { dispatch(&store, api, SyncOperation::<Project>::FetchAll).await })
}

async fn project_names(store: &StoreHandle) -> Vec<String> {
    store
        .snapshot::<Project>()
        .await
        .items()
        .iter()
        .map(|project| project.project_name.clone())
        .collect()
}

#[tokio::test]
async fn test_last_completed_fetch_wins() {
    let (tx_a, rx_a) = oneshot::channel();
    let (tx_b, rx_b) = oneshot::channel();
    let api = Arc::new(GatedApi::new(vec![rx_a, rx_b]));
    let store = StoreHandle::default();

    let task_a = spawn_fetch_all(&store, &api);
    api.wait_started(1).await;
    let task_b = spawn_fetch_all(&store, &api);
    api.wait_started(2).await;

    tx_b.send(Ok(vec![project("b", "B result")])).unwrap();
    let report_b = task_b.await.unwrap();
    assert!(report_b.is_fulfilled());
    assert_eq!(project_names(&store).await, vec!["B result"]);

    tx_a.send(Ok(vec![project("a", "A result")])).unwrap();
    let report_a = task_a.await.unwrap();
    assert!(report_a.is_fulfilled());

    assert_eq!(project_names(&store).await, vec!["A result"]);
    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.lifecycle(), RequestLifecycle::Fulfilled);
    assert_eq!(collection.in_flight(), 0);
    assert_eq!(collection.last_applied(), Some(report_a.ticket.seq));
}

#[tokio::test]
async fn test_latest_issued_policy_discards_late_result() {
    let (tx_a, rx_a) = oneshot::channel();
    let (tx_b, rx_b) = oneshot::channel();
    let api = Arc::new(GatedApi::new(vec![rx_a, rx_b]));
    let store = StoreHandle::with_policy(StorePolicy::default().ordering(OrderingPolicy::LatestIssued));

    let task_a = spawn_fetch_all(&store, &api);
    api.wait_started(1).await;
    let task_b = spawn_fetch_all(&store, &api);
    api.wait_started(2).await;

    tx_b.send(Ok(vec![project("b", "B result")])).unwrap();
    task_b.await.unwrap();
    tx_a.send(Ok(vec![project("a", "A result")])).unwrap();
    let report_a = task_a.await.unwrap();

    assert_eq!(report_a.outcome, SettleOutcome::Discarded);
    assert_eq!(project_names(&store).await, vec!["B result"]);
}

#[tokio::test]
async fn test_pending_is_visible_before_the_result() {
    let (tx, rx) = oneshot::channel();
    let api = Arc::new(GatedApi::new(vec![rx]));
    let store = StoreHandle::default();

    let task = spawn_fetch_all(&store, &api);
    api.wait_started(1).await;

    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.lifecycle(), RequestLifecycle::Pending);
    assert!(collection.is_loading());
    assert_eq!(collection.in_flight(), 1);

    tx.send(Err(RequestFailure::new("server unavailable").with_status(503)))
        .unwrap();
    let report = task.await.unwrap();

    assert_eq!(report.failure().unwrap().status, Some(503));
    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.lifecycle(), RequestLifecycle::Rejected);
    assert_eq!(collection.error().unwrap().message, "server unavailable");
    assert!(collection.items().is_empty());
}

#[tokio::test]
async fn test_error_persists_until_next_operation() {
    let api = Arc::new(MemoryApi::new());
    let client = SyncClient::new(StoreHandle::default(), Arc::clone(&api));
    api.fail_next(impactdesk::EntityKind::Project, RequestFailure::new("offline"))
        .await;

    let report = client.fetch_all::<Project>().await;
    assert!(report.clone().into_result().is_err());
    for _ in 0..3 {
        let collection = client.store().snapshot::<Project>().await;
        assert_eq!(collection.error().unwrap().message, "offline");
    }

    let retry = client.fetch_all::<Project>().await;
    assert!(retry.is_fulfilled());
    let collection = client.store().snapshot::<Project>().await;
    assert!(collection.error().is_none());
    assert_eq!(collection.lifecycle(), RequestLifecycle::Fulfilled);
}

#[tokio::test]
async fn test_create_appends_exactly_once() {
    let api = Arc::new(MemoryApi::new());
    api.seed(vec![project("p-1", "Existing")]).await.unwrap();
    let client = SyncClient::new(StoreHandle::default(), api);

    client.fetch_all::<Project>().await.into_result().unwrap();
    client
        .create::<Project>(NewProject::named("Fresh"))
        .await
        .into_result()
        .unwrap();

    let collection = client.store().snapshot::<Project>().await;
    assert_eq!(collection.len(), 2);
    let created = collection.items().last().unwrap();
    assert_eq!(created.project_name, "Fresh");
    let occurrences = collection
        .items()
        .iter()
        .filter(|item| item.id == created.id)
        .count();
    assert_eq!(occurrences, 1);
}

#[tokio::test]
async fn test_delete_clears_focused_entity() {
    let api = Arc::new(MemoryApi::new());
    api.seed(vec![project("p-1", "One"), project("p-2", "Two")])
        .await
        .unwrap();
    let client = SyncClient::new(StoreHandle::default(), api);

    client.fetch_all::<Project>().await.into_result().unwrap();
    client
        .fetch_by_id::<Project>(EntityId::from("p-1"))
        .await
        .into_result()
        .unwrap();
    assert_eq!(
        client.store().snapshot::<Project>().await.current().unwrap().id.as_str(),
        "p-1"
    );

    client
        .delete::<Project>(EntityId::from("p-1"))
        .await
        .into_result()
        .unwrap();

    let collection = client.store().snapshot::<Project>().await;
    assert!(collection.current().is_none());
    assert_eq!(collection.ids(), vec![EntityId::from("p-2")]);
}

#[tokio::test]
async fn test_failed_delete_keeps_items() {
    let api = Arc::new(MemoryApi::new());
    api.seed(vec![project("p-1", "One")]).await.unwrap();
    let client = SyncClient::new(StoreHandle::default(), api);
    client.fetch_all::<Project>().await.into_result().unwrap();

    let report = client.delete::<Project>(EntityId::from("ghost")).await;

    assert_eq!(report.failure().unwrap().status, Some(404));
    let collection = client.store().snapshot::<Project>().await;
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.lifecycle(), RequestLifecycle::Rejected);
}

#[tokio::test]
async fn test_dropped_caller_still_settles() {
    let (tx, rx) = oneshot::channel();
    let api = Arc::new(GatedApi::new(vec![rx]));
    let store = StoreHandle::default();

    let call = dispatch(&store, Arc::clone(&api), SyncOperation::<Project>::FetchAll);
    let abandoned = tokio::time::timeout(Duration::from_millis(50), call).await;
    assert!(abandoned.is_err());

    api.wait_started(1).await;
    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.lifecycle(), RequestLifecycle::Pending);
    assert_eq!(collection.in_flight(), 1);

    tx.send(Ok(vec![project("a", "Late result")])).unwrap();
    for _ in 0..200 {
        if store.snapshot::<Project>().await.in_flight() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.in_flight(), 0);
    assert_eq!(collection.lifecycle(), RequestLifecycle::Fulfilled);
    assert_eq!(project_names(&store).await, vec!["Late result"]);
}

#[tokio::test]
async fn test_panicking_request_is_rejected() {
    let store = StoreHandle::default();

    let report = dispatch(&store, Arc::new(PanickingApi), SyncOperation::<Project>::FetchAll).await;

    assert_eq!(report.failure().unwrap().message, "request panicked");
    let collection = store.snapshot::<Project>().await;
    assert_eq!(collection.lifecycle(), RequestLifecycle::Rejected);
    assert_eq!(collection.in_flight(), 0);
}
