//! Pass 3: Layout classification

use crate::dom::{Document, NodeId};
use crate::policy::TwoColumnRule;
use crate::select::TextPattern;

/// Tag the container around each move-list heading with the layout hint.
///
/// For every heading at the rule's level whose text starts with the rule's
/// prefix (ignoring case), the nearest ancestor with a container tag gets the
/// hint class. Re-running adds nothing: the token is only appended when
/// missing. Returns the number of containers newly tagged.
pub fn mark_two_column(doc: &mut Document, rule: &TwoColumnRule) -> usize {
    let pattern = TextPattern::starts_with(&rule.heading_prefix).ignore_case();

    let containers: Vec<NodeId> = doc
        .traverse(doc.root())
        .filter(|&id| doc.heading_level(id) == Some(rule.heading_level))
        .filter(|&id| pattern.is_match(&doc.normalized_text(id)))
        .filter_map(|heading| {
            doc.ancestors(heading).find(|&a| {
                doc.tag(a)
                    .is_some_and(|tag| rule.containers.iter().any(|c| c == tag))
            })
        })
        .collect();

    containers
        .into_iter()
        .filter(|&container| doc.add_class(container, &rule.hint))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_marks_nearest_container() {
        let mut doc = parse_html(
            r#"<section id="outer"><div id="col"><h4>Moves learnt by level up</h4><table></table></div></section>"#,
        );

        assert_eq!(mark_two_column(&mut doc, &TwoColumnRule::default()), 1);

        let col = doc.find_by_id("col").unwrap();
        let outer = doc.find_by_id("outer").unwrap();
        assert!(doc.has_class(col, "two-column"));
        assert!(!doc.has_class(outer, "two-column"));
    }

    #[test]
    fn test_marking_is_idempotent() {
        let mut doc = parse_html(
            r#"<div class="grid-col"><h4>Moves learnt by TM</h4><h4>moves learnt by HM</h4></div>"#,
        );
        let rule = TwoColumnRule::default();

        assert_eq!(mark_two_column(&mut doc, &rule), 1);
        assert_eq!(mark_two_column(&mut doc, &rule), 0);

        let div = doc.find_by_tag("div").unwrap();
        assert_eq!(doc.classes(div), &["grid-col".to_string(), "two-column".to_string()]);
    }

    #[test]
    fn test_ignores_other_headings() {
        let mut doc = parse_html(
            r#"<div><h3>Moves learnt by level up</h3></div><div><h4>Egg moves</h4></div>"#,
        );

        assert_eq!(mark_two_column(&mut doc, &TwoColumnRule::default()), 0);
    }
}
