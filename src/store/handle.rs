use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::{ResourceStore, StorePolicy, Stored};
use crate::collection::EntityCollection;

/// Shared handle to the process-wide store, passed explicitly to every
/// operation call site.
///
/// The lock is only held for the synchronous begin/settle steps, never across
/// a request, so any number of operations can be in flight at once.
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<Mutex<ResourceStore>>,
}

impl StoreHandle {
    pub fn new(store: ResourceStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_policy(policy: StorePolicy) -> Self {
        Self::new(ResourceStore::new(policy))
    }

    pub async fn lock(&self) -> MutexGuard<'_, ResourceStore> {
        self.inner.lock().await
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ResourceStore) -> R) -> R {
        let store = self.inner.lock().await;
        f(&store)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut ResourceStore) -> R) -> R {
        let mut store = self.inner.lock().await;
        f(&mut store)
    }

    /// Owned copy of one collection, for rendering outside the lock.
    pub async fn snapshot<T: Stored>(&self) -> EntityCollection<T> {
        self.read(|store| store.collection::<T>().clone()).await
    }

    /// Full application reset, used on logout.
    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}
