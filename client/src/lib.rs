//! # Pulseboard Client
//!
//! Client-side session layer: durable session storage, the logged-in
//! state machine with its expiry timers, and the authenticated HTTP
//! transport that reacts to server-side token expiry.

pub mod http;
pub mod session;
pub mod storage;

pub use http::{AuthClient, ClientError};
pub use session::{AuthSession, SessionEvent};
pub use storage::{FileStore, MemoryStore, SessionStore, StorageError};
