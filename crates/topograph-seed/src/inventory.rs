//! Live inventory snapshots and seeding from them.
//!
//! A snapshot maps region name to the instances, load balancers and
//! observed traffic in that region:
//!
//! ```json
//! {
//!   "us-east-1": {
//!     "instances": { "i-1": { "name": "api-web-1", "internal_ip": "10.0.0.5" } },
//!     "load_balancers": { "api-lb": { "instances": ["i-1"] } },
//!     "traffic": { "i-1": ["i-2"] }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use topograph_core::types::{REL_HTTP, REL_INTERNET, REL_PORT};
use topograph_core::{type_from_name, NodeId, Properties, ServerType};
use topograph_graph::{GraphClient, NodeRef};

use crate::error::{Result, SeedError};
use crate::{name_root, SeedReport, SeedSource};

/// Region name → that region's inventory.
pub type InventorySnapshot = BTreeMap<String, RegionInventory>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInventory {
    /// Instance id → instance metadata.
    #[serde(default)]
    pub instances: BTreeMap<String, InstanceInfo>,

    /// Load balancer name → load balancer metadata.
    #[serde(default)]
    pub load_balancers: BTreeMap<String, LoadBalancerInfo>,

    /// Instance id → ids of instances it was seen talking to.
    #[serde(default)]
    pub traffic: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub name: String,
    #[serde(default)]
    pub dns_name: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub internal_ip: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub project: Option<String>,
}

impl InstanceInfo {
    /// Node properties for this instance.
    pub fn to_properties(&self, instance_id: &str, region: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), self.name.clone().into());
        props.insert("type".to_string(), type_from_name(&self.name).as_str().into());
        props.insert("instance id".to_string(), instance_id.into());
        insert_opt(&mut props, "dns name", &self.dns_name);
        insert_opt(&mut props, "size", &self.size);
        insert_opt(&mut props, "internal ip", &self.internal_ip);
        if !self.roles.is_empty() {
            props.insert("roles".to_string(), self.roles.join(", ").into());
        }
        insert_opt(&mut props, "project", &self.project);
        props.insert("region".to_string(), region.into());
        props
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerInfo {
    #[serde(default)]
    pub dns_name: Option<String>,
    /// Member instance ids.
    #[serde(default)]
    pub instances: Vec<String>,
}

impl LoadBalancerInfo {
    pub fn to_properties(&self, name: &str, region: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), name.into());
        props.insert("type".to_string(), ServerType::Lb.as_str().into());
        insert_opt(&mut props, "dns name", &self.dns_name);
        props.insert("region".to_string(), region.into());
        props
    }
}

fn insert_opt(props: &mut Properties, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        props.insert(key.to_string(), v.clone().into());
    }
}

// ── Fetching ─────────────────────────────────────────────────────

/// HTTP client for the inventory service.
#[derive(Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    url: Url,
}

impl InventoryClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| SeedError::Config(format!("invalid inventory url {url}: {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    /// Download the current snapshot.
    pub async fn fetch_snapshot(&self) -> Result<InventorySnapshot> {
        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SeedError::InventoryStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }
        let bytes = resp.bytes().await?;
        let snapshot: InventorySnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| SeedError::InventoryParse(e.to_string()))?;

        tracing::info!(
            url = %self.url,
            regions = snapshot.len(),
            instances = snapshot.values().map(|r| r.instances.len()).sum::<usize>(),
            "Fetched inventory snapshot"
        );
        Ok(snapshot)
    }
}

// ── Seeding ──────────────────────────────────────────────────────

/// Write an inventory snapshot into the graph.
///
/// Instances are created first (across all regions) so that load balancer
/// members and traffic edges can refer to instances in any region.
/// Endpoints that do not map to a created instance are skipped. A snapshot
/// with no instances and no load balancers writes nothing, the root included.
pub async fn seed_inventory(
    graph: &GraphClient,
    snapshot: &InventorySnapshot,
) -> Result<SeedReport> {
    let mut report = SeedReport::new(SeedSource::Inventory);
    let root = NodeRef::Id(NodeId::ROOT);

    let empty = snapshot
        .values()
        .all(|r| r.instances.is_empty() && r.load_balancers.is_empty());
    if empty {
        tracing::warn!(regions = snapshot.len(), "Inventory snapshot is empty, graph left unseeded");
        return Ok(report.finish());
    }

    name_root(graph).await?;

    let mut instances: HashMap<&str, NodeRef> = HashMap::new();
    for (region, inventory) in snapshot {
        for (instance_id, info) in &inventory.instances {
            let node = graph
                .create_node(&info.to_properties(instance_id, region))
                .await?;
            instances.insert(instance_id.as_str(), NodeRef::from(&node));
            report.nodes_created += 1;
        }
    }

    for (region, inventory) in snapshot {
        for (name, lb) in &inventory.load_balancers {
            let node = graph.create_node(&lb.to_properties(name, region)).await?;
            let lb_ref = NodeRef::from(&node);
            report.nodes_created += 1;

            graph.create_relationship(REL_INTERNET, &root, &lb_ref).await?;
            report.relationships_created += 1;

            for member in &lb.instances {
                match instances.get(member.as_str()) {
                    Some(member_ref) => {
                        graph.create_relationship(REL_HTTP, &lb_ref, member_ref).await?;
                        report.relationships_created += 1;
                    }
                    None => {
                        tracing::warn!(lb = %name, instance = %member, "Unknown load balancer member, skipping");
                    }
                }
            }
        }
    }

    for inventory in snapshot.values() {
        for (source, destinations) in &inventory.traffic {
            let Some(from) = instances.get(source.as_str()) else {
                tracing::warn!(instance = %source, "Traffic from unknown instance, skipping");
                continue;
            };
            for dest in destinations {
                match instances.get(dest.as_str()) {
                    Some(to) => {
                        graph.create_relationship(REL_PORT, from, to).await?;
                        report.relationships_created += 1;
                    }
                    None => {
                        tracing::warn!(from = %source, to = %dest, "Traffic to unknown instance, skipping");
                    }
                }
            }
        }
    }

    Ok(report.finish())
}
