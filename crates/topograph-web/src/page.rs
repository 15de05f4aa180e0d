//! The single index page.

use topograph_graph::NodeRef;

use crate::neighborhood::escape_html;

const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

/// Render the index page, pre-selecting `neoid` when it names a node.
///
/// Ids that do not parse as a node reference are dropped so nothing
/// arbitrary reaches the page's script.
pub fn render_index(neoid: Option<&str>) -> String {
    let selected = neoid
        .map(str::trim)
        .filter(|raw| NodeRef::parse(raw).is_ok())
        .map(escape_html)
        .unwrap_or_default();
    INDEX_TEMPLATE.replace("{{neoid}}", &selected)
}
