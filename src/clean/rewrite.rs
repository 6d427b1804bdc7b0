//! Pass 2: Rewrite (content substitution and heading shift)

use crate::dom::{Document, NodeId, html_name};
use crate::policy::{IconLabel, LinkUnwrap, Policy};
use crate::select::select;

/// Number of nodes each rewrite step replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub icons: usize,
    pub links: usize,
    pub headings: usize,
}

/// Run content substitution, then the heading shift if the policy asks.
pub fn rewrite(doc: &mut Document, policy: &Policy) -> RewriteReport {
    let icons = substitute_icons(doc, &policy.icon_labels);
    let links = unwrap_links(doc, &policy.link_unwrap);
    let headings = if policy.shift_headings {
        shift_headings(doc)
    } else {
        0
    };

    RewriteReport {
        icons,
        links,
        headings,
    }
}

/// Replace icon elements with their fixed text label.
pub fn substitute_icons(doc: &mut Document, labels: &[IconLabel]) -> usize {
    let mut replaced = 0;
    for icon in labels {
        for id in select(doc, doc.root(), &icon.target) {
            let text = doc.create_text(icon.label.as_str());
            doc.replace(id, text);
            replaced += 1;
        }
    }
    replaced
}

/// Replace qualifying links with their visible text.
pub fn unwrap_links(doc: &mut Document, rule: &LinkUnwrap) -> usize {
    let Some(target) = &rule.target else {
        return 0;
    };

    let links = select(doc, doc.root(), target);
    for &a in &links {
        let text = doc.text_content(a);
        let node = doc.create_text(text);
        doc.replace(a, node);
    }
    links.len()
}

/// Demote every `h3` to `h4` and every `h2` to `h3`.
///
/// Levels are read once before any node is replaced, so a heading moves by
/// exactly one level. The document remembers the shift and later calls do
/// nothing. The new heading takes the old one's place and children; the
/// old heading's attributes are not carried over.
pub fn shift_headings(doc: &mut Document) -> usize {
    if doc.headings_shifted() {
        log::debug!("headings already shifted, skipping");
        return 0;
    }

    let headings: Vec<(NodeId, u8)> = doc
        .traverse(doc.root())
        .filter_map(|id| match doc.heading_level(id) {
            Some(level @ (2 | 3)) => Some((id, level)),
            _ => None,
        })
        .collect();

    for &(old, level) in &headings {
        let tag = format!("h{}", level + 1);
        let new = doc.create_element(html_name(&tag), Vec::new());
        doc.reparent_children(old, new);
        doc.replace(old, new);
    }

    doc.mark_headings_shifted();
    headings.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn heading_levels(doc: &Document) -> Vec<u8> {
        doc.traverse(doc.root())
            .filter_map(|id| doc.heading_level(id))
            .collect()
    }

    #[test]
    fn test_icons_become_labels() {
        let mut doc = parse_html(
            r#"<table><tr><td><img title="Physical" src="p.png"></td><td><img title="Special"></td><td><img title="Other"></td></tr></table>"#,
        );
        let labels: Vec<_> = ["Physical", "Status", "Special"]
            .into_iter()
            .map(IconLabel::titled_image)
            .collect();

        assert_eq!(substitute_icons(&mut doc, &labels), 2);

        let cells = doc.find_all_by_tag("td");
        assert_eq!(doc.normalized_text(cells[0]), "Physical");
        assert_eq!(doc.normalized_text(cells[1]), "Special");
        assert_eq!(doc.find_all_by_tag("img").len(), 1);
    }

    #[test]
    fn test_links_unwrap_by_class_and_href() {
        let mut doc = parse_html(
            r#"<p>
                 <a class="ent-name" href="/pokedex/ivysaur">Ivysaur</a>
                 <a class="type-icon type-grass" href="/type/grass">Grass</a>
                 <a href="/ABILITY/overgrow">Overgrow</a>
                 <a href="/move/tackle">Tackle</a>
               </p>"#,
        );
        let rule = LinkUnwrap::new(&["ent-name", "type-icon"], &["tm", "ability"]);

        assert_eq!(unwrap_links(&mut doc, &rule), 3);

        let remaining = doc.find_all_by_tag("a");
        assert_eq!(remaining.len(), 1);
        assert_eq!(doc.attr(remaining[0], "href"), Some("/move/tackle"));

        let p = doc.find_by_tag("p").unwrap();
        assert_eq!(doc.normalized_text(p), "Ivysaur Grass Overgrow Tackle");
    }

    #[test]
    fn test_empty_link_rule_unwraps_nothing() {
        let mut doc = parse_html(r#"<a class="ent-name" href="/tm/sv/tm001">01</a>"#);

        assert_eq!(unwrap_links(&mut doc, &LinkUnwrap::default()), 0);
        assert_eq!(doc.find_all_by_tag("a").len(), 1);
    }

    #[test]
    fn test_shift_moves_each_level_once() {
        let mut doc = parse_html("<h1>Title</h1><h2>Pokédex data</h2><h3>Moves learnt by level up</h3>");

        assert_eq!(shift_headings(&mut doc), 2);
        assert_eq!(heading_levels(&doc), vec![1, 3, 4]);
    }

    #[test]
    fn test_second_shift_is_noop() {
        let mut doc = parse_html("<h2>Base stats</h2><h3>Egg moves</h3>");

        shift_headings(&mut doc);
        assert_eq!(shift_headings(&mut doc), 0);
        assert_eq!(heading_levels(&doc), vec![3, 4]);
    }

    #[test]
    fn test_shift_keeps_children_and_position() {
        let mut doc = parse_html(r#"<div><p><img src="a"></p><h2>Stats <small>(Gen 9)</small></h2><table></table></div>"#);

        shift_headings(&mut doc);

        let div = doc.find_by_tag("div").unwrap();
        let tags: Vec<_> = doc
            .children(div)
            .iter()
            .filter_map(|&c| doc.tag(c))
            .collect();
        assert_eq!(tags, vec!["p", "h3", "table"]);

        let h3 = doc.find_by_tag("h3").unwrap();
        assert_eq!(doc.normalized_text(h3), "Stats (Gen 9)");
        assert!(doc.find_by_tag("small").is_some());
    }
}
