//! In-memory document gateway backed by `DashMap`.

use super::{Document, PersistenceGateway};
use crate::constants::fields;
use crate::error::{Result, StoreError};
use crate::validation::{validate_collection_name, validate_document_id, validate_document_payload};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Process-local document store
///
/// Each collection is a `BTreeMap` so listings come back in id order.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    collections: DashMap<String, BTreeMap<String, Document>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document under a caller-chosen id
    pub fn put(&self, collection: &str, id: &str, mut document: Document) -> Result<()> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;
        validate_document_payload(&document)?;

        if let Value::Object(map) = &mut document {
            map.insert(fields::ID.to_string(), Value::String(id.to_string()));
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id))
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn create(&self, collection: &str, mut document: Document) -> Result<Document> {
        validate_collection_name(collection)?;
        validate_document_payload(&document)?;

        let id = Uuid::new_v4().simple().to_string();
        if let Value::Object(map) = &mut document {
            map.insert(fields::ID.to_string(), Value::String(id.clone()));
        }

        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document.clone());

        debug!(collection = %collection, id = %id, "Document created");
        Ok(document)
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Document> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;

        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<()> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;
        validate_document_payload(&patch)?;

        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let existing = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        match (existing, patch) {
            (Value::Object(target), Value::Object(fields_to_set)) => {
                for (key, value) in fields_to_set {
                    if key != fields::ID {
                        target.insert(key, value);
                    }
                }
            }
            _ => {
                return Err(StoreError::persistence(
                    collection,
                    "update",
                    format!("stored document {id} is not an object"),
                ))
            }
        }

        debug!(collection = %collection, id = %id, "Document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;

        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut docs| docs.remove(id));

        match removed {
            Some(_) => {
                debug!(collection = %collection, id = %id, "Document deleted");
                Ok(())
            }
            None => Err(StoreError::not_found(collection, id)),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        validate_collection_name(collection)?;

        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}
