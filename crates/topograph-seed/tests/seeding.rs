//! Seeding tests against a mock Neo4j REST API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use topograph_graph::{GraphClient, GraphConfig};
use topograph_seed::error::SeedError;
use topograph_seed::inventory::InventoryClient;
use topograph_seed::{is_seeded, SeedPolicy, SeedSource, Seeder};

/// Answers `POST /db/data/node` with sequential node ids starting at 1.
struct NodeFactory {
    base: String,
    next: AtomicU64,
}

impl Respond for NodeFactory {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        let data: Value = request.body_json().unwrap_or_else(|_| json!({}));
        ResponseTemplate::new(201).set_body_json(json!({
            "self": format!("{}/db/data/node/{id}", self.base),
            "data": data,
        }))
    }
}

/// Answers `POST /db/data/node/{id}/relationships` by echoing the request.
struct RelationshipFactory {
    base: String,
}

impl Respond for RelationshipFactory {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let from = request
            .url
            .path()
            .trim_end_matches("/relationships")
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let body: Value = request.body_json().unwrap_or_else(|_| json!({}));
        ResponseTemplate::new(201).set_body_json(json!({
            "self": format!("{}/db/data/relationship/1", self.base),
            "start": format!("{}/db/data/node/{from}", self.base),
            "end": body["to"],
            "type": body["type"],
            "data": {}
        }))
    }
}

async fn mount_writes(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/db/data/node"))
        .respond_with(NodeFactory {
            base: server.uri(),
            next: AtomicU64::new(1),
        })
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/db/data/node/\d+/relationships$"))
        .respond_with(RelationshipFactory { base: server.uri() })
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/db/data/node/0/properties"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

async fn mount_empty_graph(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/db/data/node/1/properties"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn graph_for(server: &MockServer) -> GraphClient {
    GraphClient::new(&GraphConfig {
        url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

/// Short id of a node URL.
fn tail(url: &str) -> String {
    url.rsplit('/').next().unwrap_or_default().to_string()
}

/// `(from, to, type)` of every relationship the server was asked to create.
async fn created_relationships(server: &MockServer) -> Vec<(String, String, String)> {
    let requests = server.received_requests().await.unwrap();
    requests
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path().ends_with("/relationships"))
        .map(|r| {
            let body: Value = r.body_json().unwrap();
            let from = tail(r.url.path().trim_end_matches("/relationships"));
            (
                from,
                tail(body["to"].as_str().unwrap()),
                body["type"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

async fn created_nodes(server: &MockServer) -> Vec<Value> {
    let requests = server.received_requests().await.unwrap();
    requests
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/db/data/node")
        .map(|r| r.body_json().unwrap())
        .collect()
}

async fn root_writes(server: &MockServer) -> Vec<Value> {
    let requests = server.received_requests().await.unwrap();
    requests
        .iter()
        .filter(|r| r.method.as_str() == "PUT" && r.url.path() == "/db/data/node/0/properties")
        .map(|r| r.body_json().unwrap())
        .collect()
}

fn rel(from: &str, to: &str, ty: &str) -> (String, String, String) {
    (from.to_string(), to.to_string(), ty.to_string())
}

#[tokio::test]
async fn test_fixed_topology_on_empty_graph() {
    let server = MockServer::start().await;
    mount_empty_graph(&server).await;
    mount_writes(&server).await;

    let seeder = Seeder::new(graph_for(&server), SeedPolicy::Fixed);
    let report = seeder.ensure_seeded().await.unwrap().unwrap();

    assert_eq!(report.source, SeedSource::Fixed);
    assert_eq!(report.nodes_created, 5);
    assert_eq!(report.relationships_created, 6);

    let nodes = created_nodes(&server).await;
    let names: Vec<_> = nodes.iter().map(|n| n["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "ih-products-api-lb",
            "ih-products-api-web-1",
            "ih-products-api-web-2",
            "ih-products-api-db-1",
            "ih-products-api-db-2",
        ]
    );
    let types: Vec<_> = nodes.iter().map(|n| n["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["lb", "web", "web", "db", "db"]);

    assert_eq!(root_writes(&server).await, vec![json!({"name": "T'internet"})]);

    // lb=1, web1=2, web2=3, db1=4, db2=5
    assert_eq!(
        created_relationships(&server).await,
        vec![
            rel("0", "1", "80"),
            rel("1", "2", "80"),
            rel("1", "3", "80"),
            rel("2", "4", "27017"),
            rel("3", "4", "27017"),
            rel("4", "5", "27017"),
        ]
    );
}

#[tokio::test]
async fn test_already_seeded_graph_is_left_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/data/node/1/properties"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "ih-products-api-lb"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let graph = graph_for(&server);
    assert!(is_seeded(&graph).await.unwrap());

    let seeder = Seeder::new(graph, SeedPolicy::Fixed);
    assert!(seeder.ensure_seeded().await.unwrap().is_none());
}

#[tokio::test]
async fn test_node_without_name_does_not_count_as_seeded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/data/node/1/properties"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(!is_seeded(&graph_for(&server)).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_requests_seed_once() {
    let server = MockServer::start().await;
    // The first check sees an empty graph, every later one a seeded graph.
    Mock::given(method("GET"))
        .and(path("/db/data/node/1/properties"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/db/data/node/1/properties"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "ih-products-api-lb"})),
        )
        .mount(&server)
        .await;
    mount_writes(&server).await;

    let seeder = Seeder::new(graph_for(&server), SeedPolicy::Fixed);
    let other = seeder.clone();
    let (a, b) = tokio::join!(seeder.ensure_seeded(), other.ensure_seeded());
    let runs = [a.unwrap(), b.unwrap()];

    assert_eq!(runs.iter().filter(|r| r.is_some()).count(), 1);
    assert_eq!(created_nodes(&server).await.len(), 5);
}

#[tokio::test]
async fn test_failed_create_propagates() {
    let server = MockServer::start().await;
    mount_empty_graph(&server).await;
    Mock::given(method("POST"))
        .and(path("/db/data/node"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let seeder = Seeder::new(graph_for(&server), SeedPolicy::Fixed);
    let err = seeder.ensure_seeded().await.unwrap_err();
    assert!(matches!(
        err,
        SeedError::Graph(topograph_graph::GraphError::Status { status: 500, .. })
    ));
}

fn snapshot() -> Value {
    json!({
        "us-east-1": {
            "instances": {
                "i-1": {"name": "products-web-1", "internal_ip": "10.0.0.1"},
                "i-2": {"name": "products-web-2"},
                "i-3": {"name": "products-db-1", "roles": ["db"]}
            },
            "load_balancers": {
                "products-lb": {"dns_name": "products.elb", "instances": ["i-1", "i-2", "i-missing"]}
            },
            "traffic": {
                "i-1": ["i-3"],
                "i-2": ["i-3", "i-elsewhere"],
                "i-ghost": ["i-1"]
            }
        },
        "eu-west-1": {
            "instances": {
                "i-4": {"name": "reports-mongo-1"}
            },
            "load_balancers": {
                "reports-lb": {"instances": ["i-4"]}
            },
            "traffic": {
                "i-4": ["i-3"]
            }
        }
    })
}

#[tokio::test]
async fn test_inventory_seeding_counts() {
    let graph_server = MockServer::start().await;
    mount_empty_graph(&graph_server).await;
    mount_writes(&graph_server).await;

    let inventory_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snapshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot()))
        .expect(1)
        .mount(&inventory_server)
        .await;

    let inventory = InventoryClient::new(
        &format!("{}/snapshot", inventory_server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let seeder = Seeder::new(graph_for(&graph_server), SeedPolicy::Inventory(inventory));
    let report = seeder.ensure_seeded().await.unwrap().unwrap();

    // 4 instances + 2 load balancers.
    assert_eq!(report.source, SeedSource::Inventory);
    assert_eq!(report.nodes_created, 6);
    assert_eq!(created_nodes(&graph_server).await.len(), 6);
    assert_eq!(root_writes(&graph_server).await.len(), 1);

    // 2 root joins + 3 mapped members + 3 mapped traffic edges.
    assert_eq!(report.relationships_created, 8);
    let rels = created_relationships(&graph_server).await;
    assert_eq!(rels.len(), 8);
    assert_eq!(rels.iter().filter(|r| r.2 == "All the internets").count(), 2);
    assert_eq!(rels.iter().filter(|r| r.2 == "80").count(), 3);
    assert_eq!(rels.iter().filter(|r| r.2 == "PORT").count(), 3);
    assert!(rels
        .iter()
        .filter(|r| r.2 == "All the internets")
        .all(|r| r.0 == "0"));

    let nodes = created_nodes(&graph_server).await;
    let mongo = nodes
        .iter()
        .find(|n| n["name"] == "reports-mongo-1")
        .unwrap();
    assert_eq!(mongo["type"], "");
    assert_eq!(mongo["region"], "eu-west-1");
    let lb = nodes.iter().find(|n| n["name"] == "products-lb").unwrap();
    assert_eq!(lb["type"], "lb");
    assert_eq!(lb["dns name"], "products.elb");
}

#[tokio::test]
async fn test_inventory_failure_creates_nothing() {
    let graph_server = MockServer::start().await;
    mount_empty_graph(&graph_server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&graph_server)
        .await;

    let inventory_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&inventory_server)
        .await;

    let inventory = InventoryClient::new(&inventory_server.uri(), Duration::from_secs(5)).unwrap();
    let seeder = Seeder::new(graph_for(&graph_server), SeedPolicy::Inventory(inventory));
    let err = seeder.ensure_seeded().await.unwrap_err();
    assert!(matches!(err, SeedError::InventoryStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_empty_inventory_writes_nothing() {
    let graph_server = MockServer::start().await;
    mount_empty_graph(&graph_server).await;
    mount_writes(&graph_server).await;

    let inventory_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"us-east-1": {}})))
        .expect(2)
        .mount(&inventory_server)
        .await;

    let inventory = InventoryClient::new(&inventory_server.uri(), Duration::from_secs(5)).unwrap();
    let seeder = Seeder::new(graph_for(&graph_server), SeedPolicy::Inventory(inventory));

    // Nothing marks the graph as seeded, so the next call asks again.
    for _ in 0..2 {
        let report = seeder.ensure_seeded().await.unwrap().unwrap();
        assert_eq!(report.nodes_created, 0);
        assert_eq!(report.relationships_created, 0);
    }

    assert!(root_writes(&graph_server).await.is_empty());
    assert!(created_nodes(&graph_server).await.is_empty());
    assert!(!is_seeded(&graph_for(&graph_server)).await.unwrap());
}
