//! Compiled CSS selectors.

use std::fmt;

use cssparser::{Parser, ParserInput};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, Selector, SelectorList};

use crate::dom::{DexSelectors, Document, ElementRef, NodeId};
use crate::error::{Error, Result};

/// A comma-separated CSS selector list, parsed once.
#[derive(Clone)]
pub struct CssSelector {
    source: String,
    selectors: Vec<Selector<DexSelectors>>,
}

impl CssSelector {
    /// Parse a selector list such as `.grid-col.span-lg-4, footer`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let list = SelectorList::parse(&DexSelectors, &mut parser, ParseRelative::No)
            .map_err(|_| Error::InvalidSelector(source.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The selector text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check whether an element matches any selector in the list.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        if !doc.is_element(id) {
            return false;
        }
        let elem = ElementRef::new(doc, id);
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );

        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }
}

impl fmt::Debug for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CssSelector").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.find_by_tag(tag).unwrap()
    }

    #[test]
    fn test_class_selector() {
        let doc = parse_html(r#"<p class="intro highlight">Hello</p>"#);
        let p = first(&doc, "p");

        assert!(CssSelector::parse(".intro").unwrap().matches(&doc, p));
        assert!(CssSelector::parse("p.intro.highlight").unwrap().matches(&doc, p));
        assert!(!CssSelector::parse(".missing").unwrap().matches(&doc, p));
    }

    #[test]
    fn test_general_sibling_selector() {
        let doc = parse_html(
            r#"<div><div class="tabset-moves-game">moves</div><p>after</p><ul></ul></div>"#,
        );
        let selector = CssSelector::parse(".tabset-moves-game ~ *").unwrap();

        assert!(selector.matches(&doc, first(&doc, "p")));
        assert!(selector.matches(&doc, first(&doc, "ul")));
        let tabset = doc.find(|d, id| d.has_class(id, "tabset-moves-game")).unwrap();
        assert!(!selector.matches(&doc, tabset));
    }

    #[test]
    fn test_negated_descendant_selector() {
        let doc = parse_html(
            r#"<div class="tabset-moves-game">
                 <div class="sv-tabs-panel active" id="a"></div>
                 <div class="sv-tabs-panel" id="b"></div>
               </div>"#,
        );
        let selector = CssSelector::parse(
            ".tabset-moves-game .sv-tabs-panel:not(.active):not(.tabset-moves-game-form .sv-tabs-panel)",
        )
        .unwrap();

        let a = doc.find_by_id("a").unwrap();
        let b = doc.find_by_id("b").unwrap();
        assert!(!selector.matches(&doc, a));
        assert!(selector.matches(&doc, b));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(
            CssSelector::parse("div >"),
            Err(Error::InvalidSelector(_))
        ));
    }
}
