//! Node predicates.
//!
//! A [`Selector`] is evaluated against one node together with its ancestor
//! chain and subtree. Matching is pure: it never mutates the tree.
//!
//! Besides plain CSS, selectors can look at text, which CSS cannot express:
//! "the grid column whose `h2` reads *Training*" is
//!
//! ```
//! use dexsheet::select::{Selector, TextPattern};
//!
//! let training = Selector::css(".grid-col.span-md-12.span-lg-4")
//!     .unwrap()
//!     .and(Selector::has_descendant(
//!         Selector::tag("h2").and(Selector::text(TextPattern::equals("Training").ignore_case())),
//!     ));
//! # let _ = training;
//! ```

mod css;

pub use css::CssSelector;

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::util::collapse_whitespace;

/// How a [`TextPattern`] compares normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Equals,
    Contains,
    StartsWith,
}

/// A comparison against a node's normalized text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    kind: TextMatch,
    needle: String,
    ignore_case: bool,
}

impl TextPattern {
    fn new(kind: TextMatch, needle: &str) -> Self {
        Self {
            kind,
            needle: collapse_whitespace(needle),
            ignore_case: false,
        }
    }

    pub fn equals(needle: &str) -> Self {
        Self::new(TextMatch::Equals, needle)
    }

    pub fn contains(needle: &str) -> Self {
        Self::new(TextMatch::Contains, needle)
    }

    pub fn starts_with(needle: &str) -> Self {
        Self::new(TextMatch::StartsWith, needle)
    }

    /// Compare case-insensitively.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Test already-normalized text.
    pub fn is_match(&self, text: &str) -> bool {
        let (haystack, needle) = if self.ignore_case {
            (text.to_lowercase(), self.needle.to_lowercase())
        } else {
            (text.to_string(), self.needle.clone())
        };
        match self.kind {
            TextMatch::Equals => haystack == needle,
            TextMatch::Contains => haystack.contains(&needle),
            TextMatch::StartsWith => haystack.starts_with(&needle),
        }
    }
}

/// A predicate over a document node.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Compiled CSS selector list.
    Css(CssSelector),
    /// Element tag equality.
    Tag(String),
    /// Class-token membership.
    Class(String),
    /// Attribute present with exactly this value.
    AttrEquals { name: String, value: String },
    /// `href` contains any of the markers, ignoring case.
    HrefContains(Vec<String>),
    /// Normalized text content of the node itself.
    Text(TextPattern),
    /// Some descendant matches the nested selector.
    HasDescendant(Box<Selector>),
    /// Every selector matches.
    All(Vec<Selector>),
    /// At least one selector matches.
    Any(Vec<Selector>),
}

impl Selector {
    /// Compile a CSS selector list.
    pub fn css(source: &str) -> Result<Self> {
        CssSelector::parse(source).map(Self::Css)
    }

    pub fn tag(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }

    pub fn class(token: &str) -> Self {
        Self::Class(token.to_string())
    }

    pub fn attr_equals(name: &str, value: &str) -> Self {
        Self::AttrEquals {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn href_contains<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::HrefContains(
            markers
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn text(pattern: TextPattern) -> Self {
        Self::Text(pattern)
    }

    pub fn has_descendant(inner: Selector) -> Self {
        Self::HasDescendant(Box::new(inner))
    }

    /// Conjunction with another selector, flattening nested `All`s.
    pub fn and(self, other: Selector) -> Self {
        match self {
            Self::All(mut parts) => {
                parts.push(other);
                Self::All(parts)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// Disjunction with another selector, flattening nested `Any`s.
    pub fn or(self, other: Selector) -> Self {
        match self {
            Self::Any(mut parts) => {
                parts.push(other);
                Self::Any(parts)
            }
            first => Self::Any(vec![first, other]),
        }
    }
}

/// Evaluate a selector against one node. Non-elements never match.
pub fn matches(doc: &Document, id: NodeId, selector: &Selector) -> bool {
    if !doc.is_element(id) {
        return false;
    }
    match selector {
        Selector::Css(css) => css.matches(doc, id),
        Selector::Tag(tag) => doc.has_tag(id, tag),
        Selector::Class(token) => doc.has_class(id, token),
        Selector::AttrEquals { name, value } => doc.attr(id, name) == Some(value.as_str()),
        Selector::HrefContains(markers) => doc.attr(id, "href").is_some_and(|href| {
            let href = href.to_lowercase();
            markers.iter().any(|m| href.contains(m.as_str()))
        }),
        Selector::Text(pattern) => pattern.is_match(&doc.normalized_text(id)),
        Selector::HasDescendant(inner) => doc.descendants(id).any(|d| matches(doc, d, inner)),
        Selector::All(parts) => parts.iter().all(|s| matches(doc, id, s)),
        Selector::Any(parts) => parts.iter().any(|s| matches(doc, id, s)),
    }
}

/// Every attached element under `root` (inclusive) matching the selector,
/// in document order.
pub fn select(doc: &Document, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    doc.traverse(root)
        .filter(|&id| matches(doc, id, selector))
        .collect()
}

/// The first match under `root` in document order.
pub fn select_first(doc: &Document, root: NodeId, selector: &Selector) -> Option<NodeId> {
    doc.traverse(root).find(|&id| matches(doc, id, selector))
}
