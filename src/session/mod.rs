// ============================================================================
// Session
// ============================================================================
//
// Who is signed in, and what they may see. The store never checks roles;
// call sites ask the session before issuing role-restricted operations.
//
// Logging out clears the persisted session and resets the whole store.
//
// ============================================================================

pub mod manager;
pub mod state;
pub mod storage;

pub use crate::model::Role;
pub use manager::SessionManager;
pub use state::{DashboardView, Session};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage, StoredSession};
