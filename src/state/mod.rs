//! # Observable Test State
//!
//! The state slice the presentation layer renders from: the current test,
//! the test list, a loading flag and a sticky error flag.
//!
//! [`TestState`] is a cheap cloneable handle. It is injected into the
//! coordinator rather than living in a global, and every mutation is a typed
//! method that also publishes a [`StateChange`] to subscribers.

pub mod events;

use crate::models::{DocumentId, Test};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub use events::{StateChange, StatePublisher};

/// The single failure signal surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFailure {
    pub operation: String,
    pub message: String,
}

impl StoreFailure {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {}: {}", self.operation, self.message)
    }
}

#[derive(Debug, Default)]
struct StateSlice {
    current_test: Option<Test>,
    tests: Option<Vec<Test>>,
    /// Number of operations currently holding the loading flag
    in_flight: usize,
    error: Option<StoreFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct TestState {
    inner: Arc<RwLock<StateSlice>>,
    publisher: StatePublisher,
}

impl TestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher(publisher: StatePublisher) -> Self {
        Self {
            inner: Arc::default(),
            publisher,
        }
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<StateChange> {
        self.publisher.subscribe()
    }

    pub fn set_current_test(&self, test: Option<Test>) {
        let test_id = test.as_ref().and_then(|t| t.id.clone());
        self.inner.write().current_test = test;
        self.publisher
            .publish(StateChange::CurrentTestChanged { test_id });
    }

    pub fn set_test_list(&self, tests: Vec<Test>) {
        let count = tests.len();
        self.inner.write().tests = Some(tests);
        self.publisher.publish(StateChange::TestListChanged { count });
    }

    /// Raise (`true`) or release (`false`) one hold on the loading flag
    pub fn set_loading(&self, loading: bool) {
        let changed = {
            let mut slice = self.inner.write();
            let was_loading = slice.in_flight > 0;
            if loading {
                slice.in_flight += 1;
            } else {
                slice.in_flight = slice.in_flight.saturating_sub(1);
            }
            was_loading != (slice.in_flight > 0)
        };

        if changed {
            self.publisher.publish(StateChange::LoadingChanged(loading));
        }
    }

    /// Raise the loading flag until the returned guard is dropped
    pub fn begin_loading(&self) -> LoadingGuard {
        self.set_loading(true);
        LoadingGuard {
            state: self.clone(),
        }
    }

    /// Record a failure; the flag stays raised until [`clear_error`](Self::clear_error)
    pub fn set_error(&self, failure: StoreFailure) {
        self.inner.write().error = Some(failure.clone());
        self.publisher.publish(StateChange::ErrorRaised(failure));
    }

    pub fn clear_error(&self) {
        let had_error = self.inner.write().error.take().is_some();
        if had_error {
            self.publisher.publish(StateChange::ErrorCleared);
        }
    }

    pub fn current_test(&self) -> Option<Test> {
        self.inner.read().current_test.clone()
    }

    pub fn test_list(&self) -> Option<Vec<Test>> {
        self.inner.read().tests.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().in_flight > 0
    }

    pub fn error(&self) -> Option<StoreFailure> {
        self.inner.read().error.clone()
    }

    pub fn has_error(&self) -> bool {
        self.inner.read().error.is_some()
    }

    /// Task structure of the current test
    pub fn tasks(&self) -> Vec<Value> {
        self.inner
            .read()
            .current_test
            .as_ref()
            .map(|t| t.tasks().to_vec())
            .unwrap_or_default()
    }

    /// Heuristic structure of the current test
    pub fn heuristics(&self) -> Vec<Value> {
        self.inner
            .read()
            .current_test
            .as_ref()
            .map(|t| t.heuristics().to_vec())
            .unwrap_or_default()
    }

    /// Cooperator list id of the current test
    pub fn cooperators_ref(&self) -> Option<DocumentId> {
        self.inner
            .read()
            .current_test
            .as_ref()
            .and_then(|t| t.cooperators.clone())
    }
}

/// Releases one hold on the loading flag when dropped
#[must_use = "the loading flag is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    state: TestState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.set_loading(false);
    }
}
