//! Related entity coordinators implemented on top of a [`PersistenceGateway`].

use super::{CooperatorCoordinator, RelatedEntities, RelatedEntityCoordinator};
use crate::config::CollectionsConfig;
use crate::constants::fields;
use crate::error::Result;
use crate::gateway::PersistenceGateway;
use crate::models::{CooperatorList, CooperatorRoster, ListKind, TestReference};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Deletes documents of a single collection by id
#[derive(Clone)]
pub struct GatewayRelatedEntities {
    gateway: Arc<dyn PersistenceGateway>,
    collection: String,
}

impl GatewayRelatedEntities {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, collection: impl Into<String>) -> Self {
        Self {
            gateway,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl RelatedEntityCoordinator for GatewayRelatedEntities {
    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.gateway.delete(&self.collection, id).await
    }
}

/// Cooperator lists plus the `myTests`/`myAnswers` lists on user documents
#[derive(Clone)]
pub struct GatewayCooperators {
    gateway: Arc<dyn PersistenceGateway>,
    cooperators_collection: String,
    users_collection: String,
}

impl GatewayCooperators {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        cooperators_collection: impl Into<String>,
        users_collection: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            cooperators_collection: cooperators_collection.into(),
            users_collection: users_collection.into(),
        }
    }
}

#[async_trait]
impl CooperatorCoordinator for GatewayCooperators {
    async fn fetch_cooperators(&self, id: &str) -> Result<CooperatorRoster> {
        let document = self.gateway.read(&self.cooperators_collection, id).await?;
        let list: CooperatorList = serde_json::from_value(document)?;
        let roster = list.into_roster();
        if !roster.rejected.is_empty() {
            warn!(
                list_id = %id,
                rejected = roster.rejected.len(),
                decoded = roster.cooperators.len(),
                "Cooperator list has undecodable entries"
            );
        }
        Ok(roster)
    }

    async fn remove_reference(
        &self,
        cooperator_id: &str,
        reference: &TestReference,
        list: ListKind,
    ) -> Result<()> {
        let user = self.gateway.read(&self.users_collection, cooperator_id).await?;
        let field = list.field();

        let entries = user
            .get(field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let before = entries.len();
        let remaining: Vec<Value> = entries
            .into_iter()
            .filter(|entry| {
                entry.get(fields::ID).and_then(Value::as_str) != Some(reference.id.as_str())
            })
            .collect();

        if remaining.len() == before {
            debug!(
                cooperator_id = %cooperator_id,
                test_id = %reference.id,
                list = field,
                "Reference already absent"
            );
            return Ok(());
        }

        let mut patch = Map::new();
        patch.insert(field.to_string(), Value::Array(remaining));
        self.gateway
            .update(&self.users_collection, cooperator_id, Value::Object(patch))
            .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.gateway.delete(&self.cooperators_collection, id).await
    }
}

impl RelatedEntities {
    /// Gateway-backed coordinators for every dependent collection
    pub fn from_gateway(
        gateway: Arc<dyn PersistenceGateway>,
        collections: &CollectionsConfig,
    ) -> Self {
        Self {
            reports: Arc::new(GatewayRelatedEntities::new(
                gateway.clone(),
                collections.reports.clone(),
            )),
            answers: Arc::new(GatewayRelatedEntities::new(
                gateway.clone(),
                collections.answers.clone(),
            )),
            cooperators: Arc::new(GatewayCooperators::new(
                gateway,
                collections.cooperators.clone(),
                collections.users.clone(),
            )),
        }
    }
}
