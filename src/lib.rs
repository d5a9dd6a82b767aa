#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Usability Core
//!
//! Lifecycle management for usability and survey **tests** stored in a
//! document database.
//!
//! ## Overview
//!
//! A test owns a report document, an answer set and a cooperator list, and
//! every cooperator's user document points back at it. The
//! [`TestLifecycleCoordinator`] creates, loads, updates and deletes tests,
//! keeping those dependents consistent, and mirrors the results into an
//! observable [`TestState`] that a presentation layer renders from.
//!
//! ## Module Organization
//!
//! - [`coordinator`] - Test lifecycle orchestration and cascading delete
//! - [`controller`] - Typed operations over the tests collection
//! - [`related`] - Coordinators for reports, answers and cooperators
//! - [`gateway`] - Persistence gateway trait and in-memory implementation
//! - [`state`] - Observable state slice and change events
//! - [`models`] - Test, cooperator and view models
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use usability_core::{InMemoryGateway, NewTest, StoreConfig, TestLifecycleCoordinator};
//!
//! # async fn example() {
//! usability_core::logging::init_structured_logging();
//!
//! let gateway = Arc::new(InMemoryGateway::new());
//! let coordinator = TestLifecycleCoordinator::from_gateway(gateway, StoreConfig::default());
//!
//! if let Some(id) = coordinator
//!     .create_test("Tests", &NewTest::new("Checkout heuristics", "Nielsen review"))
//!     .await
//! {
//!     coordinator.get_test(&id).await;
//! }
//! assert!(!coordinator.state().is_loading());
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod related;
pub mod state;
pub mod validation;

pub use config::{CascadeMode, CollectionsConfig, ConfigLoader, StoreConfig};
pub use controller::TestController;
pub use coordinator::{
    CascadeReport, CascadeStep, CascadeStepOutcome, StepStatus, TestLifecycleCoordinator,
};
pub use error::{Result, StoreError};
pub use gateway::{Document, InMemoryGateway, PersistenceGateway};
pub use models::{
    Cooperator, CooperatorRoster, DocumentId, ListKind, NewTest, Test, TestPatch, TestReference,
    TestType, TestView,
};
pub use related::{CooperatorCoordinator, RelatedEntities, RelatedEntityCoordinator};
pub use state::{LoadingGuard, StateChange, StoreFailure, TestState};
