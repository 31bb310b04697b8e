// ============================================================================
// Entity Collection
// ============================================================================
//
// One ordered, id-keyed mirror of a remote collection plus a single focused
// `current` slot, the shared request lifecycle and the last failure.
//
// Invariants:
// - ids in `items` are unique after every call
// - `current` is independent of `items`
// - every mutation is synchronous and touches only this collection
//
// ============================================================================

use crate::core::{EntityId, RequestFailure, Result};
use crate::lifecycle::{OperationKind, RequestLifecycle, RequestSeq, RequestTicket};
use crate::model::{Entity, EntityPatch};
use crate::store::OrderingPolicy;
use tracing::{debug, warn};

/// Mirror of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCollection<T: Entity> {
    items: Vec<T>,
    current: Option<T>,
    lifecycle: RequestLifecycle,
    error: Option<RequestFailure>,
    last_issued: RequestSeq,
    last_applied: Option<RequestSeq>,
    in_flight: usize,
}

/// Result of a targeted merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// Nothing carried the id; the collection is unchanged.
    NotFound,
}

/// Successful result of an operation, shaped by its merge rule.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput<T: Entity> {
    /// fetch-all / fetch-by-parent: full replace of `items`.
    Listed(Vec<T>),
    /// fetch-by-id: upsert into `items` and focus as `current`.
    Fetched(T),
    /// create: append to `items`.
    Created(T),
    /// update: shallow merge into the matching item and `current`.
    Updated { id: EntityId, patch: EntityPatch },
    /// delete: remove from `items`, clear a matching `current`.
    Deleted(EntityId),
}

/// What happened when a result reached its collection.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleOutcome {
    Fulfilled,
    Rejected(RequestFailure),
    /// Dropped because a newer request had already been applied.
    Discarded,
}

impl SettleOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, SettleOutcome::Fulfilled)
    }

    pub fn failure(&self) -> Option<&RequestFailure> {
        match self {
            SettleOutcome::Rejected(failure) => Some(failure),
            _ => None,
        }
    }
}

// Collection implementation is split by concern, the same way the rest of the
// crate keeps its larger types readable.
include!("collection/base_collection.rs");
include!("collection/merge_paths.rs");
include!("collection/settle_paths.rs");
