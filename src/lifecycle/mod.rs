pub mod state;

pub use state::{OperationKind, RequestLifecycle, RequestSeq, RequestTicket};
