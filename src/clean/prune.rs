//! Pass 1: Pruning (subtree removal)

use crate::dom::{Document, NodeId};
use crate::policy::{Policy, SiblingRun};
use crate::select::{Selector, select};

/// Number of subtrees each pruning step removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub by_selector: usize,
    pub labeled_rows: usize,
    pub paragraphs: usize,
    pub sibling_runs: usize,
}

impl PruneReport {
    pub fn total(&self) -> usize {
        self.by_selector + self.labeled_rows + self.paragraphs + self.sibling_runs
    }
}

/// Run every removal step of the policy.
///
/// Selector removals go first so the later steps see the pruned tree.
pub fn prune(doc: &mut Document, policy: &Policy) -> PruneReport {
    let by_selector = remove_matching(doc, &policy.removals);
    let labeled_rows = remove_labeled_rows(doc, &policy.row_labels);
    let paragraphs = remove_imageless_paragraphs(doc);
    let sibling_runs = policy
        .sibling_runs
        .iter()
        .map(|run| remove_sibling_run(doc, run))
        .sum();

    PruneReport {
        by_selector,
        labeled_rows,
        paragraphs,
        sibling_runs,
    }
}

/// Remove every node matching each rule, rule by rule.
///
/// Matches are collected per rule against the current tree, so a rule never
/// sees nodes an earlier rule already removed. A match nested inside another
/// match of the same rule goes with its ancestor and is not counted twice.
pub fn remove_matching(doc: &mut Document, rules: &[Selector]) -> usize {
    let mut removed = 0;
    for rule in rules {
        for id in select(doc, doc.root(), rule) {
            if doc.is_attached(id) && doc.remove(id) {
                removed += 1;
            }
        }
    }
    removed
}

/// Drop every table row holding a `th` whose text is one of `labels`.
///
/// Comparison is exact and case-sensitive on whitespace-normalized text.
/// Running it again on a cleaned tree removes nothing.
pub fn remove_labeled_rows(doc: &mut Document, labels: &[String]) -> usize {
    if labels.is_empty() {
        return 0;
    }

    let rows: Vec<NodeId> = doc
        .find_all_by_tag("th")
        .into_iter()
        .filter(|&th| {
            let text = doc.normalized_text(th);
            labels.iter().any(|label| *label == text)
        })
        .filter_map(|th| doc.ancestors(th).find(|&a| doc.has_tag(a, "tr")))
        .collect();

    rows.into_iter()
        .filter(|&tr| doc.is_attached(tr) && doc.remove(tr))
        .count()
}

/// Remove paragraphs without any image inside, keeping captioned images.
pub fn remove_imageless_paragraphs(doc: &mut Document) -> usize {
    let prose: Vec<NodeId> = doc
        .find_all_by_tag("p")
        .into_iter()
        .filter(|&p| !doc.descendants(p).any(|d| doc.has_tag(d, "img")))
        .collect();

    prose
        .into_iter()
        .filter(|&p| doc.is_attached(p) && doc.remove(p))
        .count()
}

/// Walk forward from each anchor, removing element siblings while their tag
/// is permitted. Stops at the first element sibling with another tag.
///
/// Text between siblings is skipped, not removed. A missing anchor is a
/// no-op.
pub fn remove_sibling_run(doc: &mut Document, run: &SiblingRun) -> usize {
    let mut removed = 0;

    for anchor in select(doc, doc.root(), &run.anchor) {
        if !doc.is_attached(anchor) {
            continue;
        }

        let mut cursor = doc.next_element_sibling(anchor);
        while let Some(sibling) = cursor {
            let permitted = doc
                .tag(sibling)
                .is_some_and(|tag| run.permitted.iter().any(|p| p == tag));
            if !permitted {
                break;
            }
            cursor = doc.next_element_sibling(sibling);
            doc.remove(sibling);
            removed += 1;
        }

        if run.remove_anchor && doc.remove(anchor) {
            removed += 1;
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;
    use crate::select::TextPattern;

    fn tags_under_body(doc: &Document) -> Vec<String> {
        let body = doc.find_by_tag("body").unwrap();
        doc.children(body)
            .iter()
            .filter_map(|&c| doc.tag(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_removes_selector_matches_in_order() {
        let mut doc = parse_html(
            r#"<div class="sr-only">skip</div><nav class="main-menu"><span class="sr-only">x</span></nav><p><img src="a.png"></p>"#,
        );
        let rules = vec![
            Selector::css(".main-menu").unwrap(),
            Selector::css(".sr-only").unwrap(),
        ];

        let removed = remove_matching(&mut doc, &rules);

        // The nested .sr-only left with its nav
        assert_eq!(removed, 2);
        assert_eq!(tags_under_body(&doc), vec!["p"]);
    }

    #[test]
    fn test_labeled_rows_are_removed() {
        let mut doc = parse_html(
            r#"<table>
                 <tr><th>National №</th><td>0003</td></tr>
                 <tr><th>Type</th><td>Grass</td></tr>
                 <tr><th> Height </th><td>2.0 m</td></tr>
                 <tr><th>height</th><td>kept, case differs</td></tr>
               </table>"#,
        );
        let labels = vec!["National №".to_string(), "Height".to_string()];

        assert_eq!(remove_labeled_rows(&mut doc, &labels), 2);
        assert_eq!(doc.find_all_by_tag("tr").len(), 2);
    }

    #[test]
    fn test_labeled_row_removal_is_idempotent() {
        let mut doc = parse_html(
            r#"<table><tr><th>Species</th><td>Seed</td></tr><tr><th>Type</th><td>Grass</td></tr></table>"#,
        );
        let labels = vec!["Species".to_string()];

        assert_eq!(remove_labeled_rows(&mut doc, &labels), 1);
        assert_eq!(remove_labeled_rows(&mut doc, &labels), 0);
        assert_eq!(doc.find_all_by_tag("tr").len(), 1);
    }

    #[test]
    fn test_image_paragraphs_survive() {
        let mut doc = parse_html(r#"<p><img src="x"/></p><p>Some prose</p>"#);

        assert_eq!(remove_imageless_paragraphs(&mut doc), 1);

        let paragraphs = doc.find_all_by_tag("p");
        assert_eq!(paragraphs.len(), 1);
        assert!(doc.find_by_tag("img").is_some());
    }

    #[test]
    fn test_sibling_run_removes_anchor_and_lists() {
        let mut doc = parse_html(
            r#"<h2>Bulbasaur changes</h2>
               <ul><li>a</li></ul>
               <ul><li>b</li></ul>
               <table></table>
               <ul><li>after the run</li></ul>"#,
        );
        let run = SiblingRun::new(
            Selector::tag("h2").and(Selector::text(TextPattern::contains("changes").ignore_case())),
            &["ul"],
        )
        .removing_anchor();

        assert_eq!(remove_sibling_run(&mut doc, &run), 3);
        assert_eq!(tags_under_body(&doc), vec!["table", "ul"]);
    }

    #[test]
    fn test_sibling_run_keeps_anchor() {
        let mut doc = parse_html(
            r#"<div id="dex-flavor"></div><h3>Red</h3><div>text</div><h3>Blue</h3><p><img src="i"></p><div>kept</div>"#,
        );
        let run = SiblingRun::new(Selector::attr_equals("id", "dex-flavor"), &["div", "h3"]);

        assert_eq!(remove_sibling_run(&mut doc, &run), 3);
        assert_eq!(tags_under_body(&doc), vec!["div", "p", "div"]);
    }

    #[test]
    fn test_sibling_run_without_anchor_is_noop() {
        let html = r#"<h3>Red</h3><div>text</div>"#;
        let mut doc = parse_html(html);
        let before = doc.len();
        let run = SiblingRun::new(Selector::attr_equals("id", "dex-flavor"), &["div", "h3"]);

        assert_eq!(remove_sibling_run(&mut doc, &run), 0);
        assert_eq!(doc.len(), before);
        assert_eq!(tags_under_body(&doc), vec!["h3", "div"]);
    }

    #[test]
    fn test_prune_report_totals() {
        let mut doc = parse_html(
            r#"<footer>f</footer><p>prose</p><table><tr><th>Height</th></tr></table>"#,
        );
        let mut policy = Policy::passthrough();
        policy.removals = vec![Selector::css("footer").unwrap()];
        policy.row_labels = vec!["Height".to_string()];

        let report = prune(&mut doc, &policy);

        assert_eq!(report.by_selector, 1);
        assert_eq!(report.labeled_rows, 1);
        assert_eq!(report.paragraphs, 1);
        assert_eq!(report.sibling_runs, 0);
        assert_eq!(report.total(), 3);
    }
}
