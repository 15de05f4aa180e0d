//! Error types for the topograph-seed crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Graph error: {0}")]
    Graph(#[from] topograph_graph::GraphError),

    #[error("Inventory request failed: {0}")]
    Inventory(#[from] reqwest::Error),

    #[error("Inventory returned {status} for {url}")]
    InventoryStatus { status: u16, url: String },

    #[error("Failed to parse inventory snapshot: {0}")]
    InventoryParse(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SeedError>;
