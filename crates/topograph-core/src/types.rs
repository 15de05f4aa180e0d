//! Core domain types for the Topograph infrastructure graph.
//!
//! These types describe servers, load balancers and the relationships
//! between them as they are stored in the graph database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// String-keyed node properties as stored in the graph database.
///
/// Key order is preserved so that rendered property lists follow the
/// order the database returned them in.
pub type Properties = serde_json::Map<String, serde_json::Value>;

// ── Node Ids ──────────────────────────────────────────────────────

/// Numeric identifier the graph database assigns to a node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The synthetic "internet" node every topology hangs off.
    pub const ROOT: NodeId = NodeId(0);

    /// The first node created by a seeding run. Its `name` property marks
    /// the graph as already seeded.
    pub const SEED_MARKER: NodeId = NodeId(1);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(NodeId)
    }
}

/// Name given to the root node.
pub const ROOT_NAME: &str = "T'internet";

// ── Servers ───────────────────────────────────────────────────────

/// Tier a server belongs to, stored as the node's `type` property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    Lb,
    Web,
    Db,
    /// No recognizable tier. Stored as an empty string.
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lb => "lb",
            Self::Web => "web",
            Self::Db => "db",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a server tier from its host name.
///
/// Patterns are checked in order, so `mongo-db-1` is a Mongo host (no tier)
/// rather than a `db` host.
pub fn type_from_name(name: &str) -> ServerType {
    if name.contains("-lb") {
        ServerType::Lb
    } else if name.contains("web") {
        ServerType::Web
    } else if name.contains("mongo") {
        ServerType::Unknown
    } else if name.contains("db") {
        ServerType::Db
    } else {
        ServerType::Unknown
    }
}

/// A named server to be written into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub name: String,
    pub server_type: ServerType,
}

impl Server {
    pub fn new(name: impl Into<String>, server_type: ServerType) -> Self {
        Self {
            name: name.into(),
            server_type,
        }
    }

    /// Node properties for this server.
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), self.name.clone().into());
        props.insert("type".to_string(), self.server_type.as_str().into());
        props
    }
}

// ── Relationship Types ────────────────────────────────────────────

/// Relationship type used for HTTP traffic.
pub const REL_HTTP: &str = "80";

/// Relationship type used for MongoDB replication and queries.
pub const REL_MONGO: &str = "27017";

/// Relationship type for traffic observed between two instances.
pub const REL_PORT: &str = "PORT";

/// Relationship type joining the root node to a load balancer.
pub const REL_INTERNET: &str = "All the internets";
