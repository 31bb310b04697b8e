// ============================================================================
// Request Lifecycle
// ============================================================================
//
// Every collection carries one lifecycle flag shared by all of its
// operations. The flag has no terminal state:
//
//   Idle ──begin──> Pending ──settle──> Fulfilled | Rejected ──begin──> Pending ...
//
// Requests are numbered per collection so a settlement can be matched to the
// request that produced it.
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the most recent settled (or still open) interaction with a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestLifecycle {
    /// No operation has been issued since creation or reset.
    #[default]
    Idle,

    /// An operation has been issued and its result has not been applied yet.
    Pending,

    /// The last applied result was a success.
    Fulfilled,

    /// The last applied result was a failure.
    Rejected,
}

impl RequestLifecycle {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestLifecycle::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestLifecycle::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            RequestLifecycle::Fulfilled | RequestLifecycle::Rejected
        )
    }

    /// Entered synchronously when an operation starts, from any state.
    pub fn begin(&mut self) {
        *self = RequestLifecycle::Pending;
    }

    pub fn fulfill(&mut self) {
        *self = RequestLifecycle::Fulfilled;
    }

    pub fn reject(&mut self) {
        *self = RequestLifecycle::Rejected;
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestLifecycle::Idle => "idle",
            RequestLifecycle::Pending => "pending",
            RequestLifecycle::Fulfilled => "fulfilled",
            RequestLifecycle::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-collection request number, increasing in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestSeq(pub u64);

impl RequestSeq {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> RequestSeq {
        RequestSeq(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req_{}", self.0)
    }
}

/// The named operations a collection can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    FetchAll,
    FetchByParent,
    FetchById,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::FetchAll => "fetch_all",
            OperationKind::FetchByParent => "fetch_by_parent",
            OperationKind::FetchById => "fetch_by_id",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }

    /// List fetches replace `items` wholesale.
    pub fn is_list_fetch(&self) -> bool {
        matches!(self, OperationKind::FetchAll | OperationKind::FetchByParent)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt handed out when an operation begins; required to settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: RequestSeq,
    pub op: OperationKind,
}
