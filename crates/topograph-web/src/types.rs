//! Response types for the neighborhood view.

use serde::{Deserialize, Serialize};

use topograph_core::Properties;

/// Neighborhood of one node, as consumed by the index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Heading plus a bullet list of the node's raw properties.
    pub details_html: String,
    pub data: NeighborhoodData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodData {
    /// One entry per `Incoming:<type>` / `Outgoing:<type>` group.
    pub attributes: Vec<RelationshipGroup>,
    /// The node's `name` property, `null` if it has none.
    pub name: serde_json::Value,
    /// Short id of the node.
    pub id: String,
    /// The node's `type` property, `null` if it has none.
    #[serde(rename = "type")]
    pub node_type: serde_json::Value,
}

/// Neighbors reached over relationships of one type and direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGroup {
    /// Relationship type. Absent on the "No Relationships" placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `Incoming:<type>` or `Outgoing:<type>`.
    pub name: String,
    /// Neighbor properties, each with an added short `id`.
    pub values: Vec<Properties>,
}
