//! Asynchronous operations bound to one collection.
//!
//! Every operation follows the same protocol: mark the owning collection
//! `pending`, perform exactly one request through the API collaborator, then
//! apply the operation's merge rule (or record the failure). Nothing is
//! retried automatically; a retry is a new operation.

pub mod client;
pub mod operation;

pub use crate::collection::{OperationOutput, SettleOutcome};
pub use client::{OperationReport, SyncClient, dispatch};
pub use operation::SyncOperation;
