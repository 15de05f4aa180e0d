//! Read operations and traversal descriptions for the graph.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use topograph_core::{NodeId, Properties};

use crate::client::{check_status, is_not_found, read_json, GraphClient, GraphError};
use crate::node_ref::NodeRef;

/// A node as represented by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Canonical self URL.
    #[serde(rename = "self")]
    pub self_url: String,
    #[serde(default)]
    pub data: Properties,
}

impl NodeRecord {
    pub fn id(&self) -> Result<NodeId, GraphError> {
        NodeRef::from(self).node_id()
    }

    pub fn short_id(&self) -> String {
        NodeRef::from(self).short_id()
    }
}

/// A relationship as represented by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    #[serde(rename = "self")]
    pub self_url: String,
    /// Self URL of the start node.
    pub start: String,
    /// Self URL of the end node.
    pub end: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub data: Properties,
}

/// One path returned by a `fullpath` traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalPath {
    pub start: NodeRecord,
    pub end: NodeRecord,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    pub length: u32,
}

// ── Traversal Descriptions ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    DepthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uniqueness {
    /// Every relationship yields its own path, even to an already-seen node.
    None,
}

/// Which nodes a traversal reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnFilter {
    pub language: String,
    pub name: String,
}

impl ReturnFilter {
    pub fn all_but_start_node() -> Self {
        Self::builtin("all_but_start_node")
    }

    fn builtin(name: &str) -> Self {
        Self {
            language: "builtin".to_string(),
            name: name.to_string(),
        }
    }
}

/// Traversal description posted to `/node/{id}/traverse/{type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalSpec {
    pub order: TraversalOrder,
    pub uniqueness: Uniqueness,
    pub return_filter: ReturnFilter,
    pub max_depth: u32,
}

impl TraversalSpec {
    /// Every node one hop away in either direction, start node excluded,
    /// one path per relationship.
    pub fn neighbours() -> Self {
        Self {
            order: TraversalOrder::DepthFirst,
            uniqueness: Uniqueness::None,
            return_filter: ReturnFilter::all_but_start_node(),
            max_depth: 1,
        }
    }
}

impl GraphClient {
    // ── Single Node Lookups ──────────────────────────────────────

    /// Fetch a node. A missing node is `GraphError::NotFound`.
    pub async fn get_node(&self, node: &NodeRef) -> Result<NodeRecord, GraphError> {
        let id = node.node_id()?;
        let url = self.node_url(id)?;
        let resp = self.send(self.request(Method::GET, url.clone())).await?;
        if is_not_found(resp.status()) {
            return Err(GraphError::NotFound { id: id.to_string() });
        }
        let resp = check_status(resp, &url).await?;
        read_json(resp).await
    }

    /// Fetch a node's properties, or `None` if the node does not exist.
    pub async fn get_node_properties(
        &self,
        node: &NodeRef,
    ) -> Result<Option<Properties>, GraphError> {
        let id = node.node_id()?;
        let url = self.endpoint(&format!("db/data/node/{id}/properties"))?;
        let resp = self.send(self.request(Method::GET, url.clone())).await?;
        match resp.status() {
            s if is_not_found(s) => Ok(None),
            StatusCode::NO_CONTENT => Ok(Some(Properties::new())),
            _ => {
                let resp = check_status(resp, &url).await?;
                Ok(Some(read_json(resp).await?))
            }
        }
    }

    // ── Traversals ───────────────────────────────────────────────

    /// Run a traversal and return full paths (nodes and relationships).
    pub async fn traverse(
        &self,
        node: &NodeRef,
        spec: &TraversalSpec,
    ) -> Result<Vec<TraversalPath>, GraphError> {
        self.traverse_as(node, "fullpath", spec).await
    }

    /// Run a traversal and return only the matched nodes.
    pub async fn traverse_nodes(
        &self,
        node: &NodeRef,
        spec: &TraversalSpec,
    ) -> Result<Vec<NodeRecord>, GraphError> {
        self.traverse_as(node, "node", spec).await
    }

    async fn traverse_as<T: serde::de::DeserializeOwned>(
        &self,
        node: &NodeRef,
        return_type: &str,
        spec: &TraversalSpec,
    ) -> Result<Vec<T>, GraphError> {
        let id = node.node_id()?;
        let url = self.endpoint(&format!("db/data/node/{id}/traverse/{return_type}"))?;
        let resp = self
            .send(self.request(Method::POST, url.clone()).json(spec))
            .await?;
        if is_not_found(resp.status()) {
            return Err(GraphError::NotFound { id: id.to_string() });
        }
        let resp = check_status(resp, &url).await?;
        let results: Vec<T> = read_json(resp).await?;
        tracing::debug!(node = %id, return_type, count = results.len(), "Traversal complete");
        Ok(results)
    }
}
