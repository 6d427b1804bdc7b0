//! Linearization of a cleaned tree into layout blocks.
//!
//! The walk starts at the content root and visits nodes in document order.
//! Each element is classified once into a [`NodeKind`]; block-producing
//! kinds emit and stop, containers descend.

mod table;

pub use table::{extract_table, outermost_tables};

use url::Url;

use crate::block::{HeadingLevel, Image, LayoutBlock};
use crate::dom::{Document, NodeId};
use crate::policy::Policy;
use crate::select::select_first;
use crate::source::ImageSource;

/// What an element contributes to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Heading(HeadingLevel),
    Table,
    TwoColumnGroup,
    Paragraph,
    Container,
    /// Emits nothing and is not descended into.
    Skip,
}

/// Turns a cleaned document into a block sequence.
pub struct Linearizer<'a> {
    policy: &'a Policy,
    base: Option<&'a Url>,
    images: Option<&'a dyn ImageSource>,
}

impl<'a> Linearizer<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            base: None,
            images: None,
        }
    }

    /// Resolve relative image references against `base`.
    pub fn with_base(mut self, base: &'a Url) -> Self {
        self.base = Some(base);
        self
    }

    /// Fetch image bytes through `images`.
    pub fn with_images(mut self, images: &'a dyn ImageSource) -> Self {
        self.images = Some(images);
        self
    }

    /// Where the walk starts: the policy's content root, else `body`, else
    /// the document node.
    pub fn content_root(&self, doc: &Document) -> NodeId {
        select_first(doc, doc.root(), &self.policy.content_root)
            .or_else(|| doc.find_by_tag("body"))
            .unwrap_or_else(|| doc.root())
    }

    pub fn linearize(&self, doc: &Document) -> Vec<LayoutBlock> {
        let mut blocks = Vec::new();

        let title = doc.find_by_tag("h1");
        if let Some(h1) = title {
            blocks.push(LayoutBlock::Title {
                text: doc.normalized_text(h1),
            });
        }

        let mut stack = vec![self.content_root(doc)];
        while let Some(id) = stack.pop() {
            if Some(id) == title {
                continue;
            }
            match self.classify(doc, id) {
                NodeKind::Heading(level) => blocks.push(LayoutBlock::Heading {
                    level,
                    text: doc.normalized_text(id),
                }),
                NodeKind::Table => blocks.push(LayoutBlock::Table(extract_table(doc, id))),
                NodeKind::TwoColumnGroup => blocks.push(two_column_group(doc, id)),
                NodeKind::Paragraph => blocks.extend(self.images_in(doc, id)),
                NodeKind::Container => stack.extend(doc.children(id).iter().rev().copied()),
                NodeKind::Skip => {}
            }
        }

        log::debug!("linearized {} blocks", blocks.len());
        blocks
    }

    fn classify(&self, doc: &Document, id: NodeId) -> NodeKind {
        if id == doc.root() {
            return NodeKind::Container;
        }
        let Some(tag) = doc.tag(id) else {
            return NodeKind::Skip;
        };
        if doc.has_class(id, &self.policy.two_column.hint) {
            return NodeKind::TwoColumnGroup;
        }
        if let Some(level) = doc.heading_level(id) {
            return HeadingLevel::from_level(level).map_or(NodeKind::Skip, NodeKind::Heading);
        }
        match tag {
            "table" => NodeKind::Table,
            "p" => NodeKind::Paragraph,
            "script" | "style" | "template" | "noscript" => NodeKind::Skip,
            _ => NodeKind::Container,
        }
    }

    fn images_in(&self, doc: &Document, paragraph: NodeId) -> Vec<LayoutBlock> {
        doc.descendants(paragraph)
            .filter(|&id| doc.has_tag(id, "img"))
            .filter_map(|img| self.image_block(doc, img))
            .collect()
    }

    fn image_block(&self, doc: &Document, img: NodeId) -> Option<LayoutBlock> {
        let Some(src) = doc.attr(img, "src").map(str::trim).filter(|s| !s.is_empty()) else {
            log::warn!("skipping image without src");
            return None;
        };

        let resolved = match self.base {
            Some(base) => base.join(src),
            None => Url::parse(src),
        };
        let url = match resolved {
            Ok(url) => url,
            Err(e) => {
                log::warn!("skipping image {src:?}: {e}");
                return None;
            }
        };

        let data = match self.images {
            Some(images) => match images.fetch(&url) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("omitting image {url}: {e}");
                    return None;
                }
            },
            None => None,
        };

        Some(LayoutBlock::Image(Image {
            source: url.into(),
            data,
        }))
    }
}

fn two_column_group(doc: &Document, container: NodeId) -> LayoutBlock {
    let mut headings = doc
        .descendants(container)
        .filter(|&id| matches!(doc.heading_level(id), Some(3 | 4)))
        .map(|h| doc.normalized_text(h));
    let heading = headings.next();
    let dropped: Vec<String> = headings.collect();
    if !dropped.is_empty() {
        log::debug!(
            "two-column group {:?} absorbs tables under {dropped:?}",
            heading.as_deref().unwrap_or_default()
        );
    }
    let tables = outermost_tables(doc, container)
        .into_iter()
        .map(|t| extract_table(doc, t))
        .collect();

    LayoutBlock::TwoColumnGroup { heading, tables }
}
