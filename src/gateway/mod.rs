//! # Persistence Gateway
//!
//! Generic create/read/update/delete/list contract over a document database,
//! keyed by collection name and document id.
//!
//! The coordinator and the related entity coordinators only ever talk to the
//! database through this trait. [`InMemoryGateway`] is the reference
//! implementation used for embedding and tests.

pub mod memory;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use memory::InMemoryGateway;

/// A JSON object as stored in a collection
pub type Document = Value;

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Store a new document and return it with its assigned `id`
    async fn create(&self, collection: &str, document: Document) -> Result<Document>;

    /// Fetch one document
    async fn read(&self, collection: &str, id: &str) -> Result<Document>;

    /// Shallow-merge the top-level fields of `patch` into an existing document
    ///
    /// The `id` field is never overwritten.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<()>;

    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// All documents of a collection
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;
}
