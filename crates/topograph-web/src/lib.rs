//! topograph-web: Neighborhood view and HTTP front end for the Topograph graph.
//!
//! Serves a single index page (seeding the graph on first load) and a JSON
//! endpoint describing any node's one-hop neighborhood, grouped by
//! relationship type and direction.

pub mod error;
pub mod handler;
pub mod neighborhood;
pub mod page;
pub mod server;
pub mod types;

pub use error::WebError;
pub use handler::AppState;
pub use server::{router, HttpServer};
pub use types::{Neighborhood, NeighborhoodData, RelationshipGroup};
