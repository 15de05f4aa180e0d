//! topograph-core: Shared types, configuration, and error handling for Topograph.
//!
//! This crate provides the foundational types used across all Topograph components:
//! - Node ids, server tiers and relationship types for the infrastructure graph
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::TopographError;
pub use types::{type_from_name, NodeId, Properties, Server, ServerType};
