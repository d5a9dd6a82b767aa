//! # Test Controller
//!
//! Domain operations over the tests collection: typed creation, view-scoped
//! retrieval and update stamping. Gateway documents are decoded into
//! [`Test`] here so the coordinator never handles raw JSON.

use crate::constants::fields;
use crate::error::Result;
use crate::gateway::{Document, PersistenceGateway};
use crate::models::{Test, TestView};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct TestController {
    gateway: Arc<dyn PersistenceGateway>,
    collection: String,
}

impl std::fmt::Debug for TestController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestController")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl TestController {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, collection: impl Into<String>) -> Self {
        Self {
            gateway,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Store a normalized test document in `collection`
    pub async fn create_test(&self, collection: &str, document: Document) -> Result<Test> {
        let created = self.gateway.create(collection, document).await?;
        decode(created)
    }

    pub async fn get_test(&self, id: &str, view: TestView) -> Result<Test> {
        let document = self.gateway.read(&self.collection, id).await?;
        Ok(view.apply(decode(document)?))
    }

    pub async fn list_tests(&self, view: TestView) -> Result<Vec<Test>> {
        let documents = self.gateway.list(&self.collection).await?;
        debug!(
            collection = %self.collection,
            count = documents.len(),
            view = ?view,
            "Listing tests"
        );
        documents
            .into_iter()
            .map(|document| decode(document).map(|test| view.apply(test)))
            .collect()
    }

    /// Stamp `updateDate` on a test and return the refreshed list
    pub async fn touch_test(&self, id: &str) -> Result<Vec<Test>> {
        let mut stamp = Map::new();
        stamp.insert(
            fields::UPDATE_DATE.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.gateway
            .update(&self.collection, id, Value::Object(stamp))
            .await?;
        self.list_tests(TestView::Full).await
    }
}

fn decode(document: Document) -> Result<Test> {
    Ok(serde_json::from_value(document)?)
}
