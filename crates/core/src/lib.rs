//! Treehouse domain core.
//!
//! One workspace per user, a forest of pages keyed by a nullable parent
//! reference, a persistence gateway with Postgres and in-memory backends,
//! an incrementally maintained sidebar tree, and the client-side session
//! layer (optimistic document store + workspace shell).

pub mod document;
pub mod events;
pub mod gateway;
pub mod session;
pub mod store;
pub mod tree;

pub use document::model::{Document, DocumentPatch, Workspace};
pub use document::validate::ValidationError;
pub use gateway::memory::MemoryGateway;
pub use gateway::pg::PgGateway;
pub use gateway::{Gateway, GatewayError};
pub use session::{Notice, NoticeKind, WorkspaceSession};
pub use store::DocumentStore;
pub use tree::expand::ExpandedState;
pub use tree::index::{TreeIndex, VisibleRow};

/// The single identity this deployment serves. Multi-user support would
/// replace this with an authenticated principal.
pub const DEFAULT_USER_ID: &str = "user_default";

/// Name given to a lazily created workspace.
pub const DEFAULT_WORKSPACE_NAME: &str = "Personal Workspace";

/// Placeholder title for pages created or renamed to an empty title.
pub const UNTITLED: &str = "Untitled";
