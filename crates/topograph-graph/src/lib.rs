//! Topograph Graph — Neo4j REST client for the infrastructure graph.
//!
//! This crate is the single access point for the graph database.
//! All node/relationship creation, lookups and traversals flow through
//! [`GraphClient`].

pub mod client;
pub mod mutations;
pub mod node_ref;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use node_ref::NodeRef;
pub use queries::{NodeRecord, RelationshipRecord, TraversalPath, TraversalSpec};
