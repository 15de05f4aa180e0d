//! Ways of naming a node when talking to the REST API.

use std::fmt;

use topograph_core::NodeId;

use crate::client::GraphError;
use crate::queries::NodeRecord;

/// A reference to a node: either its bare numeric id or its canonical
/// self URL (`http://host:7474/db/data/node/42`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Id(NodeId),
    Reference(String),
}

impl NodeRef {
    /// Parse a caller-supplied identifier.
    ///
    /// Anything containing a `/` is taken as a self URL, anything else must
    /// be a bare numeric id.
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        let raw = raw.trim();
        if raw.contains('/') {
            let r = NodeRef::Reference(raw.to_string());
            // Reject references whose trailing segment is not an id.
            r.node_id()?;
            return Ok(r);
        }
        raw.parse::<NodeId>()
            .map(NodeRef::Id)
            .map_err(|_| GraphError::InvalidNodeRef(raw.to_string()))
    }

    /// Trailing identifier segment of the reference.
    ///
    /// `".../node/42"` gives `"42"`; a bare id passes through unchanged.
    pub fn short_id(&self) -> String {
        match self {
            NodeRef::Id(id) => id.to_string(),
            NodeRef::Reference(url) => last_segment(url).to_string(),
        }
    }

    /// Numeric node id this reference points at.
    pub fn node_id(&self) -> Result<NodeId, GraphError> {
        match self {
            NodeRef::Id(id) => Ok(*id),
            NodeRef::Reference(url) => last_segment(url)
                .parse::<NodeId>()
                .map_err(|_| GraphError::InvalidNodeRef(url.clone())),
        }
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        NodeRef::Id(id)
    }
}

impl From<&NodeRecord> for NodeRef {
    fn from(record: &NodeRecord) -> Self {
        NodeRef::Reference(record.self_url.clone())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Id(id) => write!(f, "{id}"),
            NodeRef::Reference(url) => f.write_str(url),
        }
    }
}

/// Trailing path segment of a URL-ish string, ignoring trailing slashes.
pub fn last_segment(reference: &str) -> &str {
    let trimmed = reference.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
