// ============================================================================
// Entity Model
// ============================================================================
//
// Wire shapes of the five mirrored entity kinds. Field names follow the
// dashboard API (`project_name`, `projectid`, `fileUrl`, ...). Unknown fields
// sent by the server are ignored on decode.
//
// ============================================================================

pub mod activity;
pub mod dates;
pub mod metric;
pub mod patch;
pub mod project;
pub mod report;
pub mod user;

pub use activity::{Activity, NewActivity};
pub use metric::{Metric, NewMetric};
pub use patch::EntityPatch;
pub use project::{NewProject, Project};
pub use report::{NewReport, Report};
pub use user::{NewUser, Role, User};

use crate::core::{EntityId, EntityKind};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// Shape contract shared by every mirrored entity kind.
///
/// A collection only needs the id accessor to keep its invariants; the parent
/// accessor is exposed for callers and in-process backends and is never used
/// for referential checks.
pub trait Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Payload accepted by the `create` operation.
    type Draft: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> &EntityId;

    /// Opaque reference to the owning entity, if this kind has one.
    fn parent_id(&self) -> Option<&EntityId> {
        None
    }

    /// Materializes a draft under a server-assigned id.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;
}
