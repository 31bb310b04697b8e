// ============================================================================
// Resource Store
// ============================================================================
//
// The aggregate the application reads from and dispatches against: one
// `EntityCollection` per entity kind. Collections never affect each other;
// parent references are opaque strings and deleting a project does not touch
// its activities.
//
// ============================================================================

pub mod handle;
pub mod policy;

pub use handle::StoreHandle;
pub use policy::{OrderingPolicy, StorePolicy};

use crate::collection::EntityCollection;
use crate::core::EntityKind;
use crate::lifecycle::RequestLifecycle;
use crate::model::{Activity, Entity, Metric, Project, Report, User};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    projects: EntityCollection<Project>,
    activities: EntityCollection<Activity>,
    metrics: EntityCollection<Metric>,
    reports: EntityCollection<Report>,
    users: EntityCollection<User>,
    policy: StorePolicy,
}

/// Point-in-time summary of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub kind: EntityKind,
    pub item_count: usize,
    pub has_current: bool,
    pub lifecycle: RequestLifecycle,
    pub in_flight: usize,
    pub last_error: Option<String>,
}

/// Entity kinds that own a slot in the store.
pub trait Stored: Entity {
    fn collection(store: &ResourceStore) -> &EntityCollection<Self>;
    fn collection_mut(store: &mut ResourceStore) -> &mut EntityCollection<Self>;
}

macro_rules! stored_slot {
    ($entity:ty => $field:ident) => {
        impl Stored for $entity {
            fn collection(store: &ResourceStore) -> &EntityCollection<Self> {
                &store.$field
            }

            fn collection_mut(store: &mut ResourceStore) -> &mut EntityCollection<Self> {
                &mut store.$field
            }
        }
    };
}

stored_slot!(Project => projects);
stored_slot!(Activity => activities);
stored_slot!(Metric => metrics);
stored_slot!(Report => reports);
stored_slot!(User => users);

impl ResourceStore {
    pub fn new(policy: StorePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    pub fn collection<T: Stored>(&self) -> &EntityCollection<T> {
        T::collection(self)
    }

    pub fn collection_mut<T: Stored>(&mut self) -> &mut EntityCollection<T> {
        T::collection_mut(self)
    }

    pub fn projects(&self) -> &EntityCollection<Project> {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut EntityCollection<Project> {
        &mut self.projects
    }

    pub fn activities(&self) -> &EntityCollection<Activity> {
        &self.activities
    }

    pub fn activities_mut(&mut self) -> &mut EntityCollection<Activity> {
        &mut self.activities
    }

    pub fn metrics(&self) -> &EntityCollection<Metric> {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut EntityCollection<Metric> {
        &mut self.metrics
    }

    pub fn reports(&self) -> &EntityCollection<Report> {
        &self.reports
    }

    pub fn reports_mut(&mut self) -> &mut EntityCollection<Report> {
        &mut self.reports
    }

    pub fn users(&self) -> &EntityCollection<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut EntityCollection<User> {
        &mut self.users
    }

    /// True while any collection has an unsettled request.
    pub fn is_any_loading(&self) -> bool {
        self.stats().iter().any(|stats| stats.lifecycle.is_pending())
    }

    pub fn stats(&self) -> Vec<CollectionStats> {
        vec![
            collection_stats(&self.projects),
            collection_stats(&self.activities),
            collection_stats(&self.metrics),
            collection_stats(&self.reports),
            collection_stats(&self.users),
        ]
    }

    /// Clears every collection back to `idle`. The policy is kept.
    pub fn reset(&mut self) {
        self.projects.reset();
        self.activities.reset();
        self.metrics.reset();
        self.reports.reset();
        self.users.reset();
        info!("resource store reset");
    }
}

fn collection_stats<T: Entity>(collection: &EntityCollection<T>) -> CollectionStats {
    CollectionStats {
        kind: T::KIND,
        item_count: collection.len(),
        has_current: collection.current().is_some(),
        lifecycle: collection.lifecycle(),
        in_flight: collection.in_flight(),
        last_error: collection.error().map(|failure| failure.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::lifecycle::OperationKind;
    use crate::model::{NewActivity, NewProject};

    #[test]
    fn collections_are_independent() {
        let mut store = ResourceStore::default();
        let project = Project::from_draft(EntityId::from("p-1"), NewProject::named("Clean Water"));
        let activity = Activity::from_draft(
            EntityId::from("a-1"),
            NewActivity::new(EntityId::from("p-1"), "Borehole drilling"),
        );
        store.projects_mut().upsert(project);
        store.activities_mut().upsert(activity);

        store.projects_mut().remove(&EntityId::from("p-1"));

        assert!(store.projects().is_empty());
        assert_eq!(store.activities().len(), 1);
    }

    #[test]
    fn generic_slot_reaches_the_same_collection() {
        let mut store = ResourceStore::default();
        store.collection_mut::<Project>().begin(OperationKind::FetchAll);
        assert!(store.projects().is_loading());
        assert!(store.is_any_loading());
        assert!(!store.collection::<User>().is_loading());
    }

    #[test]
    fn reset_clears_everything_but_policy() {
        let mut store = ResourceStore::new(StorePolicy::default().ordering(OrderingPolicy::LatestIssued));
        store.projects_mut().upsert(Project::from_draft(
            EntityId::from("p-1"),
            NewProject::named("Clean Water"),
        ));
        store.users_mut().begin(OperationKind::FetchAll);

        store.reset();

        assert!(store.stats().iter().all(|stats| stats.item_count == 0
            && stats.lifecycle == RequestLifecycle::Idle
            && stats.in_flight == 0));
        assert_eq!(store.policy().ordering, OrderingPolicy::LatestIssued);
    }

    #[test]
    fn ordering_policy_parses_both_spellings() {
        assert_eq!(OrderingPolicy::parse("latest-issued"), Some(OrderingPolicy::LatestIssued));
        assert_eq!(OrderingPolicy::parse("LAST_COMPLETED"), Some(OrderingPolicy::LastCompleted));
        assert_eq!(OrderingPolicy::parse("fifo"), None);
    }
}
