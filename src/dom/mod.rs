//! In-memory document tree.
//!
//! Pages are parsed with html5ever straight into an arena [`Document`].
//! The cleaning passes mutate that tree in place; the linearizer reads it.
//!
//! # Example
//!
//! ```
//! use dexsheet::dom::parse_html;
//!
//! let doc = parse_html("<main><h1>Bulbasaur</h1></main>");
//! let h1 = doc.find_by_tag("h1").unwrap();
//! assert_eq!(doc.normalized_text(h1), "Bulbasaur");
//! ```

mod arena;
mod element_ref;
mod tree_sink;

pub use arena::{Attribute, Document, Node, NodeData, NodeId, Traverse, html_name};
pub use element_ref::{DexSelectors, ElementRef};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DocumentSink;

/// Parse an HTML string into a document tree.
pub fn parse_html(html: &str) -> Document {
    let sink = DocumentSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_document()
}

/// Parse raw page bytes, detecting the text encoding first.
///
/// Tries UTF-8, then the `<meta charset>` declared in the page, then
/// Windows-1252.
pub fn parse_html_bytes(html: &[u8]) -> Document {
    let hint = crate::util::extract_meta_charset(html);
    let text = crate::util::decode_text(html, hint.as_deref());
    parse_html(&text)
}
