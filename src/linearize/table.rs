//! Table grid extraction.

use crate::block::{Cell, Table};
use crate::dom::{Document, NodeId};

/// Build the grid for one `table` element.
///
/// Every `tr` whose nearest enclosing table is `table` becomes a row: its
/// `th` children in order, then its `td` children in order. Rows of nested
/// tables belong to the nested table.
pub fn extract_table(doc: &Document, table: NodeId) -> Table {
    let rows = doc
        .descendants(table)
        .filter(|&id| doc.has_tag(id, "tr"))
        .filter(|&tr| nearest_table(doc, tr) == Some(table))
        .map(|tr| row_cells(doc, tr))
        .collect();

    Table { rows }
}

/// Tables under `root` that are not nested inside another table under it.
pub fn outermost_tables(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .filter(|&id| doc.has_tag(id, "table"))
        .filter(|&table| {
            doc.ancestors(table)
                .take_while(|&a| a != root)
                .all(|a| !doc.has_tag(a, "table"))
        })
        .collect()
}

fn nearest_table(doc: &Document, id: NodeId) -> Option<NodeId> {
    doc.ancestors(id).find(|&a| doc.has_tag(a, "table"))
}

fn row_cells(doc: &Document, tr: NodeId) -> Vec<Cell> {
    let children = doc.children(tr);
    let headers = children
        .iter()
        .filter(|&&c| doc.has_tag(c, "th"))
        .map(|&c| Cell::header(doc.normalized_text(c)));
    let data = children
        .iter()
        .filter(|&&c| doc.has_tag(c, "td"))
        .map(|&c| Cell::data(doc.normalized_text(c)));

    headers.chain(data).collect()
}
