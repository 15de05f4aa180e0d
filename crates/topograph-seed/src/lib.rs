//! topograph-seed: One-time population of the infrastructure graph.
//!
//! An empty graph is filled either from a fixed demo topology or from a
//! live inventory snapshot. Node 1 carrying a `name` marks the graph as
//! seeded; the check is best-effort and only serialized within a process.

pub mod error;
pub mod inventory;
pub mod topology;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use topograph_core::config::{SeedSettings, SeedSourceKind};
use topograph_core::types::ROOT_NAME;
use topograph_core::{NodeId, Properties};
use topograph_graph::{GraphClient, NodeRef};

use crate::error::{Result, SeedError};
use crate::inventory::{seed_inventory, InventoryClient};
use crate::topology::seed_fixed_topology;

/// Which policy produced a seeding run.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    Fixed,
    Inventory,
}

/// Summary of one seeding run.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub source: SeedSource,
    /// Nodes created. The root node is only named, not created, and is
    /// not counted.
    pub nodes_created: usize,
    pub relationships_created: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SeedReport {
    pub(crate) fn new(source: SeedSource) -> Self {
        let now = Utc::now();
        Self {
            source,
            nodes_created: 0,
            relationships_created: 0,
            started_at: now,
            completed_at: now,
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.completed_at = Utc::now();
        self
    }
}

/// Whether a previous run already seeded the graph.
pub async fn is_seeded(graph: &GraphClient) -> Result<bool> {
    let props = graph
        .get_node_properties(&NodeRef::Id(NodeId::SEED_MARKER))
        .await?;
    Ok(props.is_some_and(|p| p.contains_key("name")))
}

/// Give the root node its fixed name.
pub(crate) async fn name_root(graph: &GraphClient) -> Result<()> {
    let mut props = Properties::new();
    props.insert("name".to_string(), ROOT_NAME.into());
    graph
        .set_node_properties(&NodeRef::Id(NodeId::ROOT), &props)
        .await?;
    Ok(())
}

/// How to populate an empty graph.
#[derive(Clone)]
pub enum SeedPolicy {
    Fixed,
    Inventory(InventoryClient),
}

/// Seeds the graph at most once per process.
#[derive(Clone)]
pub struct Seeder {
    graph: GraphClient,
    policy: SeedPolicy,
    lock: Arc<Mutex<()>>,
}

impl Seeder {
    pub fn new(graph: GraphClient, policy: SeedPolicy) -> Self {
        Self {
            graph,
            policy,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build a seeder from the `[seed]` configuration section.
    pub fn from_settings(
        graph: GraphClient,
        settings: &SeedSettings,
        timeout: Duration,
    ) -> Result<Self> {
        let policy = match settings.source {
            SeedSourceKind::Fixed => SeedPolicy::Fixed,
            SeedSourceKind::Inventory => {
                let url = settings.inventory_url.as_deref().ok_or_else(|| {
                    SeedError::Config("seed.inventory_url is required for inventory seeding".to_string())
                })?;
                SeedPolicy::Inventory(InventoryClient::new(url, timeout)?)
            }
        };
        Ok(Self::new(graph, policy))
    }

    /// Seed the graph unless it already is. Returns the report of the run
    /// if one happened.
    ///
    /// A failure part way through leaves the graph partially populated.
    pub async fn ensure_seeded(&self) -> Result<Option<SeedReport>> {
        let _guard = self.lock.lock().await;

        if is_seeded(&self.graph).await? {
            tracing::debug!("Graph already seeded, skipping");
            return Ok(None);
        }

        tracing::info!("Graph is empty, seeding");
        let report = match &self.policy {
            SeedPolicy::Fixed => seed_fixed_topology(&self.graph).await?,
            SeedPolicy::Inventory(client) => {
                let snapshot = client.fetch_snapshot().await?;
                seed_inventory(&self.graph, &snapshot).await?
            }
        };

        tracing::info!(
            source = ?report.source,
            nodes = report.nodes_created,
            relationships = report.relationships_created,
            duration_ms = (report.completed_at - report.started_at).num_milliseconds(),
            "Seeding complete"
        );
        Ok(Some(report))
    }
}
