//! The fixed five-server demo topology.

use topograph_core::types::{REL_HTTP, REL_MONGO};
use topograph_core::{NodeId, Server, ServerType};
use topograph_graph::{GraphClient, NodeRef};

use crate::error::Result;
use crate::{name_root, SeedReport, SeedSource};

/// Servers in creation order. The first one lands on the seed marker node.
pub fn fixed_servers() -> Vec<Server> {
    vec![
        Server::new("ih-products-api-lb", ServerType::Lb),
        Server::new("ih-products-api-web-1", ServerType::Web),
        Server::new("ih-products-api-web-2", ServerType::Web),
        Server::new("ih-products-api-db-1", ServerType::Db),
        Server::new("ih-products-api-db-2", ServerType::Db),
    ]
}

/// Endpoint of a fixed link: the root or an index into [`fixed_servers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Server(usize),
}

/// Links as `(from, to, relationship type)`.
pub const FIXED_LINKS: [(Endpoint, Endpoint, &str); 6] = [
    (Endpoint::Root, Endpoint::Server(0), REL_HTTP),
    (Endpoint::Server(0), Endpoint::Server(1), REL_HTTP),
    (Endpoint::Server(0), Endpoint::Server(2), REL_HTTP),
    (Endpoint::Server(1), Endpoint::Server(3), REL_MONGO),
    (Endpoint::Server(2), Endpoint::Server(3), REL_MONGO),
    (Endpoint::Server(3), Endpoint::Server(4), REL_MONGO),
];

/// Write the fixed topology: five servers, the named root, six links.
pub async fn seed_fixed_topology(graph: &GraphClient) -> Result<SeedReport> {
    let mut report = SeedReport::new(SeedSource::Fixed);

    let mut nodes = Vec::new();
    for server in fixed_servers() {
        let node = graph.create_node(&server.to_properties()).await?;
        tracing::debug!(name = %server.name, node = %node.short_id(), "Created server");
        nodes.push(NodeRef::from(&node));
        report.nodes_created += 1;
    }

    name_root(graph).await?;

    for (from, to, rel_type) in FIXED_LINKS {
        let resolve = |endpoint: Endpoint| match endpoint {
            Endpoint::Root => NodeRef::Id(NodeId::ROOT),
            Endpoint::Server(i) => nodes[i].clone(),
        };
        graph
            .create_relationship(rel_type, &resolve(from), &resolve(to))
            .await?;
        report.relationships_created += 1;
    }

    Ok(report.finish())
}
