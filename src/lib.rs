// ============================================================================
// ImpactDesk Library
// ============================================================================

pub mod api;
pub mod collection;
pub mod core;
pub mod lifecycle;
pub mod model;
pub mod preview;
pub mod session;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use crate::core::{EntityId, EntityKind, RenderFailure, RequestFailure, Result, SyncError};
pub use collection::{EntityCollection, MergeOutcome};
pub use lifecycle::{OperationKind, RequestLifecycle};
pub use model::{Activity, Entity, EntityPatch, Metric, Project, Report, Role, User};
pub use store::{OrderingPolicy, ResourceStore, StoreHandle, StorePolicy};

// Re-export the request collaborators
pub use api::{ApiConfig, AuthApi, HttpApi, MemoryApi, ResourceApi};

// ============================================================================
// High-level Sync API
// ============================================================================

pub use sync::SyncClient;
pub use sync::{OperationReport, SyncOperation, dispatch};

pub use preview::{DocumentPreview, Locator, PreviewState};
pub use session::{Session, SessionManager};
