//! html5ever TreeSink implementation for Document.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{Attribute, Document, NodeData, NodeId};

/// Handle used by TreeSink to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub NodeId);

/// TreeSink implementation that builds a Document.
///
/// Uses interior mutability (RefCell) because html5ever's TreeSink trait
/// requires methods to take `&self` but we need to mutate the tree.
pub struct DocumentSink {
    doc: RefCell<Document>,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for DocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink {
    pub fn new() -> Self {
        Self {
            doc: RefCell::new(Document::new()),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    /// Consume the sink and return the document.
    pub fn into_document(self) -> Document {
        self.doc.into_inner()
    }
}

impl TreeSink for DocumentSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Lenient like browsers; scraped pages are rarely valid
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let doc = self.doc.borrow();
        match doc.qual_name(target.0) {
            // SAFETY: names live in the arena for as long as the sink does.
            // The tree builder compares the returned name immediately and
            // never holds it across a call that allocates a node.
            Some(name) => unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) },
            None => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let converted: Vec<Attribute> = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();

        NodeHandle(self.doc.borrow_mut().create_element(name, converted))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        NodeHandle(self.doc.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        NodeHandle(self.doc.borrow_mut().create_comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append(parent.0, node.0),
            NodeOrText::AppendText(text) => doc.append_text(parent.0, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.doc.borrow().parent(element.0).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_doctype(name.to_string());
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are parsed in place
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => doc.insert_before(sibling.0, node.0),
            NodeOrText::AppendText(text) => {
                let text_node = doc.create_text(text.to_string());
                doc.insert_before(sibling.0, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut doc = self.doc.borrow_mut();
        if let Some(node) = doc.get_mut(target.0)
            && let NodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.doc.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        self.doc.borrow_mut().reparent_children(node.0, new_parent.0);
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_basic_parse() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>");

        // document + html + head + body + p + text
        assert!(doc.len() > 3);

        let p = doc.find_by_tag("p").expect("should find p");
        let text_id = doc.children(p)[0];
        assert_eq!(doc.text(text_id), Some("Hello"));
    }

    #[test]
    fn test_attributes() {
        let doc = parse_html(r#"<div id="main" class="container header">Content</div>"#);

        let div = doc.find_by_tag("div").expect("should find div");
        assert_eq!(doc.attr(div, "id"), Some("main"));
        assert!(doc.has_class(div, "container"));
        assert!(doc.has_class(div, "header"));
    }

    #[test]
    fn test_table_gets_implied_tbody() {
        let doc = parse_html("<table><tr><th>A</th><td>1</td></tr></table>");

        let tr = doc.find_by_tag("tr").expect("should find tr");
        let parent = doc.parent(tr).expect("row has parent");
        assert_eq!(doc.tag(parent), Some("tbody"));
    }

    #[test]
    fn test_misnested_formatting_is_repaired() {
        // Adoption agency moves nodes around via remove/reparent
        let doc = parse_html("<p><b>one<p>two</b></p>");

        let paragraphs = doc.find_all_by_tag("p");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.normalized_text(paragraphs[1]), "two");
    }
}
