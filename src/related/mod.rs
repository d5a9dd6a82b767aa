//! # Related Entity Coordinators
//!
//! Reports, answer sets and cooperator lists live in their own collections
//! and are owned by a test. A cascading delete reaches them only through the
//! traits defined here.

pub mod gateway_backed;

use crate::error::Result;
use crate::models::{CooperatorRoster, ListKind, TestReference};
use async_trait::async_trait;
use std::sync::Arc;

pub use gateway_backed::{GatewayCooperators, GatewayRelatedEntities};

/// Coordinator for a collection whose documents are deleted by id
#[async_trait]
pub trait RelatedEntityCoordinator: Send + Sync {
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// Coordinator for cooperator lists and the user back-references they imply
#[async_trait]
pub trait CooperatorCoordinator: Send + Sync {
    /// Cooperators recorded in the list document `id`
    ///
    /// Entries that do not decode are returned in
    /// [`CooperatorRoster::rejected`] rather than failing the whole list.
    async fn fetch_cooperators(&self, id: &str) -> Result<CooperatorRoster>;

    /// Drop `reference` from the `list` of user `cooperator_id`
    async fn remove_reference(
        &self,
        cooperator_id: &str,
        reference: &TestReference,
        list: ListKind,
    ) -> Result<()>;

    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// The dependent-entity coordinators a test lifecycle coordinator needs
#[derive(Clone)]
pub struct RelatedEntities {
    pub reports: Arc<dyn RelatedEntityCoordinator>,
    pub answers: Arc<dyn RelatedEntityCoordinator>,
    pub cooperators: Arc<dyn CooperatorCoordinator>,
}

impl std::fmt::Debug for RelatedEntities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelatedEntities").finish_non_exhaustive()
    }
}
