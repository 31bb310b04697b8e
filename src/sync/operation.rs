use crate::api::{ApiResult, ResourceApi};
use crate::collection::OperationOutput;
use crate::core::EntityId;
use crate::lifecycle::OperationKind;
use crate::model::{Entity, EntityPatch};

/// A named, parameterized request against one entity kind.
#[derive(Debug, Clone)]
pub enum SyncOperation<T: Entity> {
    FetchAll,
    FetchByParent(EntityId),
    FetchById(EntityId),
    Create(T::Draft),
    Update { id: EntityId, patch: EntityPatch },
    Delete(EntityId),
}

impl<T: Entity> SyncOperation<T> {
    pub fn kind(&self) -> OperationKind {
        match self {
            SyncOperation::FetchAll => OperationKind::FetchAll,
            SyncOperation::FetchByParent(_) => OperationKind::FetchByParent,
            SyncOperation::FetchById(_) => OperationKind::FetchById,
            SyncOperation::Create(_) => OperationKind::Create,
            SyncOperation::Update { .. } => OperationKind::Update,
            SyncOperation::Delete(_) => OperationKind::Delete,
        }
    }

    /// Issues the request and shapes a success for the collection's merge rule.
    pub async fn perform<A>(self, api: &A) -> ApiResult<OperationOutput<T>>
    where
        A: ResourceApi<T> + ?Sized,
    {
        match self {
            SyncOperation::FetchAll => api.list_all().await.map(OperationOutput::Listed),
            SyncOperation::FetchByParent(parent_id) => api
                .list_by_parent(&parent_id)
                .await
                .map(OperationOutput::Listed),
            SyncOperation::FetchById(id) => api.get_by_id(&id).await.map(OperationOutput::Fetched),
            SyncOperation::Create(draft) => api.create(&draft).await.map(OperationOutput::Created),
            SyncOperation::Update { id, patch } => api
                .update(&id, &patch)
                .await
                .map(|patch| OperationOutput::Updated { id, patch }),
            SyncOperation::Delete(id) => api
                .delete(&id)
                .await
                .map(|()| OperationOutput::Deleted(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewProject, Project};

    #[test]
    fn kind_matches_variant() {
        let op: SyncOperation<Project> = SyncOperation::Create(NewProject::named("x"));
        assert_eq!(op.kind(), OperationKind::Create);
        let op: SyncOperation<Project> = SyncOperation::FetchByParent(EntityId::from("u"));
        assert!(op.kind().is_list_fetch());
        let op: SyncOperation<Project> = SyncOperation::Update {
            id: EntityId::from("p"),
            patch: EntityPatch::new(),
        };
        assert_eq!(op.kind(), OperationKind::Update);
    }
}
