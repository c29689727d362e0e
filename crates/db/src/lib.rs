//! Document store abstraction for catalog modules.
//!
//! Modules talk to a [`Store`] in terms of collections of JSON documents,
//! filters, sort specifications and projections. [`MemoryStore`] is the
//! in-process backend used by the binary and by tests.

pub mod document;
pub mod error;
pub mod id;
pub mod memory;
pub mod store;

pub use document::{to_document, Document, Filter, Projection, SortDirection, SortSpec, ID_FIELD};
pub use error::StoreError;
pub use id::{InvalidObjectId, ObjectId};
pub use memory::MemoryStore;
pub use store::{CollectionSpec, Store};
