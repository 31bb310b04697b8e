pub mod error;
pub mod types;

pub use error::{RenderFailure, RequestFailure, Result, SyncError};
pub use types::{EntityId, EntityKind};
