//! One-hop neighborhood of a node, grouped by relationship type and
//! direction.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use topograph_core::Properties;
use topograph_graph::{GraphClient, NodeRecord, NodeRef, TraversalPath, TraversalSpec};

use crate::error::{Result, WebError};
use crate::types::{Neighborhood, NeighborhoodData, RelationshipGroup};

/// Group name used when a node has no relationships at all.
pub const NO_RELATIONSHIPS: &str = "No Relationships";

/// Fetch a node and its neighbors and format them for the index page.
pub async fn neighborhood(graph: &GraphClient, requested_id: &str) -> Result<Neighborhood> {
    let node_ref = NodeRef::parse(requested_id)?;
    let node = graph.get_node(&node_ref).await?;
    let paths = graph
        .traverse(&NodeRef::from(&node), &TraversalSpec::neighbours())
        .await?;

    tracing::debug!(node = %node.short_id(), paths = paths.len(), "Fetched neighborhood");
    build_neighborhood(requested_id.trim(), &node, &paths)
}

/// Format a node and the paths of a depth-1 traversal from it.
///
/// A relationship ending at `node` is incoming, anything else outgoing.
/// Incoming groups come first; within a direction groups keep the order in
/// which their type was first seen.
pub fn build_neighborhood(
    requested_id: &str,
    node: &NodeRecord,
    paths: &[TraversalPath],
) -> Result<Neighborhood> {
    let mut nodes: HashMap<&str, &Properties> = HashMap::new();
    let mut incoming: IndexMap<&str, Vec<Properties>> = IndexMap::new();
    let mut outgoing: IndexMap<&str, Vec<Properties>> = IndexMap::new();

    for path in paths {
        for n in &path.nodes {
            nodes.insert(n.self_url.as_str(), &n.data);
        }

        let rel = path.relationships.first().ok_or_else(|| {
            WebError::MalformedTraversal(format!("path to {} has no relationship", path.end.self_url))
        })?;

        let (groups, neighbor) = if rel.end == node.self_url {
            (&mut incoming, rel.start.as_str())
        } else {
            (&mut outgoing, rel.end.as_str())
        };

        let props = nodes.get(neighbor).ok_or_else(|| {
            WebError::MalformedTraversal(format!("neighbor {neighbor} missing from path nodes"))
        })?;
        let mut value = (*props).clone();
        value.insert(
            "id".to_string(),
            NodeRef::Reference(neighbor.to_string()).short_id().into(),
        );

        groups.entry(rel.rel_type.as_str()).or_default().push(value);
    }

    let mut attributes: Vec<RelationshipGroup> = incoming
        .into_iter()
        .map(|(rel_type, values)| group("Incoming", rel_type, values))
        .chain(
            outgoing
                .into_iter()
                .map(|(rel_type, values)| group("Outgoing", rel_type, values)),
        )
        .collect();

    if attributes.is_empty() {
        attributes.push(placeholder(requested_id));
    }

    let short_id = node.short_id();
    Ok(Neighborhood {
        details_html: details_html(&short_id, &node.data),
        data: NeighborhoodData {
            attributes,
            name: node.data.get("name").cloned().unwrap_or(Value::Null),
            id: short_id,
            node_type: node.data.get("type").cloned().unwrap_or(Value::Null),
        },
    })
}

/// The group id is the last `:`-separated segment of the label.
fn group(direction: &str, rel_type: &str, values: Vec<Properties>) -> RelationshipGroup {
    let name = format!("{direction}:{rel_type}");
    let id = name.rsplit(':').next().unwrap_or_default().to_string();
    RelationshipGroup {
        id: Some(id),
        name,
        values,
    }
}

fn placeholder(requested_id: &str) -> RelationshipGroup {
    let mut value = Properties::new();
    value.insert("id".to_string(), requested_id.into());
    value.insert("name".to_string(), NO_RELATIONSHIPS.into());
    RelationshipGroup {
        id: None,
        name: NO_RELATIONSHIPS.to_string(),
        values: vec![value],
    }
}

/// Heading with the node id and a bullet list of every property.
pub fn details_html(short_id: &str, properties: &Properties) -> String {
    let mut list = String::from("<ul>");
    for (key, value) in properties {
        list.push_str(&format!(
            "<li><b>{}:</b> {}</li>",
            escape_html(key),
            escape_html(&display_value(value))
        ));
    }
    list.push_str("</ul>");

    format!(
        "<h2>Neo ID: {}</h2>\n<p class='summary'>\n{list}</p>\n",
        escape_html(short_id)
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        // Lists print bracketed with quoted strings: ["web", "api"]
        Value::Array(items) => format!(
            "[{}]",
            items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        other => other.to_string(),
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
