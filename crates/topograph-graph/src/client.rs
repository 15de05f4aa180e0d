//! Neo4j REST connection management and shared graph client.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use topograph_core::config::GraphSettings;
use topograph_core::NodeId;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Neo4j returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Node not found: {id}")]
    NotFound { id: String },

    #[error("Invalid node reference: {0}")]
    InvalidNodeRef(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration for connecting to the Neo4j REST API.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7474".to_string(),
            user: None,
            password: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&GraphSettings> for GraphConfig {
    fn from(settings: &GraphSettings) -> Self {
        Self {
            url: settings.url.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Neo4j REST client.
///
/// This is the single point of access for all graph operations.
/// Clone is cheap (the inner reqwest client is reference counted).
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base: Url,
    auth: Option<(String, Option<String>)>,
}

impl GraphClient {
    /// Build a client for the given configuration without touching the network.
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        // A trailing slash keeps `Url::join` from dropping the last segment.
        let mut raw = config.url.trim_end_matches('/').to_string();
        raw.push('/');
        let base = Url::parse(&raw)?;

        let auth = config
            .user
            .as_ref()
            .map(|user| (user.clone(), config.password.clone()));

        Ok(Self { http, base, auth })
    }

    /// Base URL of the database server.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Check that the REST service root is reachable.
    pub async fn ping(&self) -> Result<(), GraphError> {
        let url = self.endpoint("db/data/")?;
        let resp = self.send(self.request(Method::GET, url.clone())).await?;
        check_status(resp, &url).await?;
        Ok(())
    }

    /// Canonical self URL of a node.
    pub fn node_url(&self, id: NodeId) -> Result<Url, GraphError> {
        self.endpoint(&format!("db/data/node/{id}"))
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, GraphError> {
        Ok(self.base.join(path)?)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.auth {
            Some((user, password)) => builder.basic_auth(user, password.as_ref()),
            None => builder,
        }
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, GraphError> {
        builder.send().await.map_err(|e| {
            if e.is_connect() {
                GraphError::Connection(e.to_string())
            } else {
                GraphError::Request(e)
            }
        })
    }
}

/// Turn a non-success response into `GraphError::Status`.
pub(crate) async fn check_status(resp: Response, url: &Url) -> Result<Response, GraphError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(%url, status = status.as_u16(), "Neo4j request failed");
    Err(GraphError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

/// Decode a JSON body, mapping decode failures to `Serialization`.
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, GraphError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GraphError::Serialization(e.to_string()))
}

pub(crate) fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
}
