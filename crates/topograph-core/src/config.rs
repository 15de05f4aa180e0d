//! Configuration management for Topograph services.
//!
//! Configuration is loaded from (in priority order):
//! 1. `NEO4J_URL` environment variable (graph URL only)
//! 2. Environment variables (`TOPOGRAPH__` prefix, `__` separator)
//! 3. Config file (`topograph.toml`)
//! 4. Defaults

use serde::Deserialize;

use crate::error::TopographError;

/// Environment variable that selects the graph database URL.
pub const NEO4J_URL_ENV: &str = "NEO4J_URL";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub graph: GraphSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub seed: SeedSettings,
}

/// `[graph]` section: where the Neo4j REST API lives.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    /// Base URL of the Neo4j server (default: "http://localhost:7474").
    #[serde(default = "default_graph_url")]
    pub url: String,

    /// Basic-auth user. Requests are unauthenticated when unset.
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// `[seed]` section: how an empty graph gets populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedSettings {
    #[serde(default)]
    pub source: SeedSourceKind,

    /// Inventory snapshot endpoint, required when `source = "inventory"`.
    #[serde(default)]
    pub inventory_url: Option<String>,
}

/// Which seeding policy to run against an empty graph.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedSourceKind {
    /// Fixed five-server topology.
    #[default]
    Fixed,
    /// Live snapshot from an inventory service.
    Inventory,
}

fn default_graph_url() -> String {
    "http://localhost:7474".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_bind() -> String {
    "0.0.0.0:4567".to_string()
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            url: default_graph_url(),
            user: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `<file_prefix>.toml` (optional) and the
    /// environment.
    pub fn load(file_prefix: &str) -> Result<Self, TopographError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("TOPOGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("graph.url", std::env::var(NEO4J_URL_ENV).ok())?
            .build()?;

        let app: AppConfig = cfg.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Parse configuration from TOML text, ignoring the environment.
    pub fn from_toml(toml: &str) -> Result<Self, TopographError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let app: AppConfig = cfg.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), TopographError> {
        if self.seed.source == SeedSourceKind::Inventory
            && self.seed.inventory_url.as_deref().unwrap_or("").is_empty()
        {
            return Err(TopographError::InvalidValue {
                key: "seed.inventory_url".to_string(),
                message: "required when seed.source = \"inventory\"".to_string(),
            });
        }
        if self.graph.url.trim().is_empty() {
            return Err(TopographError::InvalidValue {
                key: "graph.url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
