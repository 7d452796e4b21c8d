//! Rich-text content model for Treehouse pages.
//!
//! A page's content is persisted as a JSON string whose root is a `doc`
//! node. This crate owns the typed node tree, the canonical codec between
//! the tree and the persisted string, and the [`EditorAdapter`] that keeps
//! one editing session in step with persisted state.

pub mod adapter;
pub mod codec;
pub mod error;
pub mod node;

pub use adapter::EditorAdapter;
pub use codec::{hydrate, parse_content, serialize_content};
pub use error::ContentError;
pub use node::{Mark, Node};
