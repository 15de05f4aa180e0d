//! HTTP handlers for the index page and the neighborhood API.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use topograph_graph::GraphClient;
use topograph_seed::Seeder;

use crate::error::{Result, WebError};
use crate::neighborhood::neighborhood;
use crate::page::render_index;
use crate::types::Neighborhood;

/// Shared handler state. Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    pub graph: GraphClient,
    pub seeder: Seeder,
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub neoid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShowParams {
    pub id: Option<String>,
}

/// `GET /`: seed the graph if it is empty, then render the page.
pub async fn index_handler(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>> {
    if let Some(report) = state.seeder.ensure_seeded().await? {
        tracing::info!(
            nodes = report.nodes_created,
            relationships = report.relationships_created,
            "Seeded graph on first page load"
        );
    }
    Ok(Html(render_index(params.neoid.as_deref())))
}

/// `GET /resources/show?id=<id>`: neighborhood of a node as JSON.
pub async fn show_handler(
    State(state): State<AppState>,
    Query(params): Query<ShowParams>,
) -> Result<Json<Neighborhood>> {
    let id = params.id.ok_or(WebError::MissingParam("id"))?;
    let result = neighborhood(&state.graph, &id).await?;
    Ok(Json(result))
}
