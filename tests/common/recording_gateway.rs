//! Recording Gateway for Testing
//!
//! Wraps the in-memory gateway, records every call in order and lets a test
//! inject failures per operation, collection and (optionally) document id.
//! When a [`TestState`] is watched, its loading flag is sampled on every call.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use usability_core::{
    Document, InMemoryGateway, PersistenceGateway, Result, StoreError, TestState,
};

/// One call made against the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create { collection: String },
    Read { collection: String, id: String },
    Update { collection: String, id: String },
    Delete { collection: String, id: String },
    List { collection: String },
}

impl GatewayCall {
    pub fn operation(&self) -> &'static str {
        match self {
            GatewayCall::Create { .. } => "create",
            GatewayCall::Read { .. } => "read",
            GatewayCall::Update { .. } => "update",
            GatewayCall::Delete { .. } => "delete",
            GatewayCall::List { .. } => "list",
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            GatewayCall::Create { collection }
            | GatewayCall::Read { collection, .. }
            | GatewayCall::Update { collection, .. }
            | GatewayCall::Delete { collection, .. }
            | GatewayCall::List { collection } => collection,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            GatewayCall::Read { id, .. }
            | GatewayCall::Update { id, .. }
            | GatewayCall::Delete { id, .. } => Some(id),
            GatewayCall::Create { .. } | GatewayCall::List { .. } => None,
        }
    }
}

/// (operation, collection, id); `None` id matches every document
type FailureKey = (String, String, Option<String>);

/// Call log and configured failures
#[derive(Debug, Default, Clone)]
pub struct RecordingState {
    /// Every call in the order it reached the gateway
    pub calls: Vec<GatewayCall>,
    /// `is_loading()` of the watched state at each call
    pub loading_seen: Vec<(GatewayCall, bool)>,
    failures: HashMap<FailureKey, String>,
    watched: Option<TestState>,
}

impl RecordingState {
    fn failure_for(&self, call: &GatewayCall) -> Option<String> {
        let op = call.operation().to_string();
        let collection = call.collection().to_string();
        let specific = call
            .id()
            .and_then(|id| {
                self.failures
                    .get(&(op.clone(), collection.clone(), Some(id.to_string())))
            });
        specific
            .or_else(|| self.failures.get(&(op, collection, None)))
            .cloned()
    }
}

/// Gateway double that records calls and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingGateway {
    inner: InMemoryGateway,
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing store, for seeding documents and asserting on the end state
    pub fn store(&self) -> &InMemoryGateway {
        &self.inner
    }

    /// Fail every `operation` against `collection`
    pub fn fail_on(&self, operation: &str, collection: &str, message: &str) {
        self.state.lock().unwrap().failures.insert(
            (operation.to_string(), collection.to_string(), None),
            message.to_string(),
        );
    }

    /// Fail `operation` against one document only
    pub fn fail_on_document(&self, operation: &str, collection: &str, id: &str, message: &str) {
        self.state.lock().unwrap().failures.insert(
            (
                operation.to_string(),
                collection.to_string(),
                Some(id.to_string()),
            ),
            message.to_string(),
        );
    }

    /// Sample `state.is_loading()` whenever a call reaches the gateway
    pub fn watch_loading(&self, state: &TestState) {
        self.state.lock().unwrap().watched = Some(state.clone());
    }

    /// Loading flag observed at each call since [`watch_loading`](Self::watch_loading)
    pub fn loading_seen(&self) -> Vec<(GatewayCall, bool)> {
        self.state.lock().unwrap().loading_seen.clone()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls equal to `call`
    pub fn count(&self, call: &GatewayCall) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// Calls with the given operation, in order
    pub fn calls_of(&self, operation: &str) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation() == operation)
            .collect()
    }

    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.clear();
        state.loading_seen.clear();
    }

    fn record(&self, call: GatewayCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let failure = state.failure_for(&call);
        let (operation, collection) = (call.operation(), call.collection().to_string());
        if let Some(loading) = state.watched.as_ref().map(TestState::is_loading) {
            state.loading_seen.push((call.clone(), loading));
        }
        state.calls.push(call);
        match failure {
            Some(message) => Err(StoreError::persistence(collection, operation, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PersistenceGateway for RecordingGateway {
    async fn create(&self, collection: &str, document: Document) -> Result<Document> {
        self.record(GatewayCall::Create {
            collection: collection.to_string(),
        })?;
        self.inner.create(collection, document).await
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Document> {
        self.record(GatewayCall::Read {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        self.inner.read(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<()> {
        self.record(GatewayCall::Update {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.record(GatewayCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        self.record(GatewayCall::List {
            collection: collection.to_string(),
        })?;
        self.inner.list(collection).await
    }
}

pub fn delete_call(collection: &str, id: &str) -> GatewayCall {
    GatewayCall::Delete {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

pub fn update_call(collection: &str, id: &str) -> GatewayCall {
    GatewayCall::Update {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}
