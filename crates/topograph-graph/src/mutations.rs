//! Write operations for the graph.
//!
//! Nodes and relationships are only ever created, never updated or
//! deleted, with the exception of naming the pre-existing root node.

use reqwest::Method;
use serde_json::json;

use topograph_core::Properties;

use crate::client::{check_status, read_json, GraphClient, GraphError};
use crate::node_ref::NodeRef;
use crate::queries::{NodeRecord, RelationshipRecord};

impl GraphClient {
    // ── Nodes ────────────────────────────────────────────────────

    /// Create a node with the given properties.
    pub async fn create_node(&self, properties: &Properties) -> Result<NodeRecord, GraphError> {
        let url = self.endpoint("db/data/node")?;
        let resp = self
            .send(self.request(Method::POST, url.clone()).json(properties))
            .await?;
        let resp = check_status(resp, &url).await?;
        let node: NodeRecord = read_json(resp).await?;
        tracing::debug!(node = %node.self_url, "Created node");
        Ok(node)
    }

    /// Replace all properties of an existing node.
    pub async fn set_node_properties(
        &self,
        node: &NodeRef,
        properties: &Properties,
    ) -> Result<(), GraphError> {
        let id = node.node_id()?;
        let url = self.endpoint(&format!("db/data/node/{id}/properties"))?;
        let resp = self
            .send(self.request(Method::PUT, url.clone()).json(properties))
            .await?;
        check_status(resp, &url).await?;
        Ok(())
    }

    // ── Relationships ────────────────────────────────────────────

    /// Create a directed relationship `from -[rel_type]-> to`.
    pub async fn create_relationship(
        &self,
        rel_type: &str,
        from: &NodeRef,
        to: &NodeRef,
    ) -> Result<RelationshipRecord, GraphError> {
        let from_id = from.node_id()?;
        let to_url = self.node_url(to.node_id()?)?;
        let url = self.endpoint(&format!("db/data/node/{from_id}/relationships"))?;
        let body = json!({ "to": to_url.as_str(), "type": rel_type });

        let resp = self
            .send(self.request(Method::POST, url.clone()).json(&body))
            .await?;
        let resp = check_status(resp, &url).await?;
        let rel: RelationshipRecord = read_json(resp).await?;
        tracing::debug!(rel_type, start = %rel.start, end = %rel.end, "Created relationship");
        Ok(rel)
    }
}
