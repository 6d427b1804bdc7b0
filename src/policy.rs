//! The cleaning policy: which nodes go, which get rewritten, and how the
//! output is laid out.
//!
//! A [`Policy`] is a plain immutable value handed to the pipeline. Nothing
//! in the crate reads rule tables from global state.

use crate::error::Result;
use crate::select::{Selector, TextPattern};

/// Walk forward from an anchor, removing element siblings while their tag
/// is in `permitted`.
#[derive(Debug, Clone)]
pub struct SiblingRun {
    /// Locates the anchor node(s).
    pub anchor: Selector,
    /// Tags that may be removed; the walk stops at the first other tag.
    pub permitted: Vec<String>,
    /// Whether the anchor itself is removed after its run.
    pub remove_anchor: bool,
}

impl SiblingRun {
    pub fn new(anchor: Selector, permitted: &[&str]) -> Self {
        Self {
            anchor,
            permitted: permitted.iter().map(|t| t.to_string()).collect(),
            remove_anchor: false,
        }
    }

    pub fn removing_anchor(mut self) -> Self {
        self.remove_anchor = true;
        self
    }
}

/// Replace every element matching `target` with a fixed text label.
#[derive(Debug, Clone)]
pub struct IconLabel {
    pub target: Selector,
    pub label: String,
}

impl IconLabel {
    /// An `<img title="...">` icon whose label is its title.
    pub fn titled_image(title: &str) -> Self {
        Self {
            target: Selector::tag("img").and(Selector::attr_equals("title", title)),
            label: title.to_string(),
        }
    }
}

/// Which links collapse to their visible text.
#[derive(Debug, Clone, Default)]
pub struct LinkUnwrap {
    /// Matches the links to unwrap; `None` unwraps nothing.
    pub target: Option<Selector>,
}

impl LinkUnwrap {
    /// Unwrap `a` elements carrying any of `classes`, or whose `href`
    /// contains any of `href_markers` (ignoring case).
    pub fn new(classes: &[&str], href_markers: &[&str]) -> Self {
        let href = (!href_markers.is_empty()).then(|| Selector::href_contains(href_markers));
        let any = classes
            .iter()
            .map(|c| Selector::class(c))
            .chain(href)
            .reduce(Selector::or);

        Self {
            target: any.map(|any| Selector::tag("a").and(any)),
        }
    }
}

/// Marks move-list containers for two-column rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoColumnRule {
    /// Heading level that introduces a move list.
    pub heading_level: u8,
    /// Case-insensitive prefix of the heading text.
    pub heading_prefix: String,
    /// Tags that qualify as the enclosing container.
    pub containers: Vec<String>,
    /// Class token appended to the container.
    pub hint: String,
}

impl Default for TwoColumnRule {
    fn default() -> Self {
        Self {
            heading_level: 4,
            heading_prefix: "moves learnt by".to_string(),
            containers: vec!["div".to_string(), "section".to_string()],
            hint: "two-column".to_string(),
        }
    }
}

/// The complete removal and rewrite configuration.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Selector removals, applied in order.
    pub removals: Vec<Selector>,
    /// `th` labels whose whole row is dropped (exact, case-sensitive).
    pub row_labels: Vec<String>,
    /// Sibling-run removals, applied in order after the other removals.
    pub sibling_runs: Vec<SiblingRun>,
    pub icon_labels: Vec<IconLabel>,
    pub link_unwrap: LinkUnwrap,
    /// Demote `h2`/`h3` to `h3`/`h4` so the page title stands alone.
    pub shift_headings: bool,
    pub two_column: TwoColumnRule,
    /// Where linearization starts; falls back to `body` when absent.
    pub content_root: Selector,
}

impl Policy {
    /// The policy for species pages of the target schema.
    pub fn species_page() -> Result<Self> {
        let grid_column = || Selector::css(".grid-col.span-md-12.span-lg-4");
        let heading_reads =
            |text: &str| Selector::tag("h2").and(Selector::text(TextPattern::equals(text).ignore_case()));
        let heading_mentions = |text: &str| {
            Selector::tag("h2").and(Selector::text(TextPattern::contains(text).ignore_case()))
        };

        let removals = vec![
            Selector::css(".sr-only")?,
            Selector::css(".main-header")?,
            Selector::css(".main-menu")?,
            Selector::css(".entity-nav")?,
            Selector::css(".list-nav")?,
            grid_column()?.and(Selector::has_descendant(heading_reads("Training"))),
            heading_mentions("Evolution chart"),
            Selector::css(".infocard-list-evo")?,
            heading_mentions("Pokédex entries"),
            Selector::css("footer")?,
            Selector::css(".tabset-moves-game ~ *")?,
            Selector::css(".sv-tabs-tab-list")?,
            grid_column()?.and(Selector::has_descendant(heading_reads("Type defenses"))),
            Selector::css(
                ".tabset-moves-game .sv-tabs-panel:not(.active):not(.tabset-moves-game-form .sv-tabs-panel)",
            )?,
        ];

        let sibling_runs = vec![
            SiblingRun::new(heading_mentions("changes"), &["ul"]).removing_anchor(),
            SiblingRun::new(
                Selector::tag("div").and(Selector::attr_equals("id", "dex-flavor")),
                &["div", "h3"],
            ),
        ];

        Ok(Self {
            removals,
            row_labels: ["National №", "Height", "Species", "Local №"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            sibling_runs,
            icon_labels: ["Physical", "Status", "Special"]
                .into_iter()
                .map(IconLabel::titled_image)
                .collect(),
            link_unwrap: LinkUnwrap::new(&["ent-name", "type-icon"], &["tm", "ability"]),
            shift_headings: true,
            two_column: TwoColumnRule::default(),
            content_root: Selector::tag("main"),
        })
    }

    /// A policy that removes and rewrites nothing; only the two-column
    /// classification runs.
    ///
    /// Useful for linearizing pages that were cleaned elsewhere.
    pub fn passthrough() -> Self {
        Self {
            removals: Vec::new(),
            row_labels: Vec::new(),
            sibling_runs: Vec::new(),
            icon_labels: Vec::new(),
            link_unwrap: LinkUnwrap::default(),
            shift_headings: false,
            two_column: TwoColumnRule::default(),
            content_root: Selector::tag("main"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_page_compiles() {
        let policy = Policy::species_page().unwrap();
        assert_eq!(policy.removals.len(), 14);
        assert_eq!(policy.sibling_runs.len(), 2);
        assert!(policy.sibling_runs[0].remove_anchor);
        assert!(!policy.sibling_runs[1].remove_anchor);
        assert_eq!(policy.row_labels.len(), 4);
    }

    #[test]
    fn test_link_unwrap_selector() {
        let doc = crate::dom::parse_html(
            r#"<a id="name" class="ent-name" href="/pokedex/ivysaur">Ivysaur</a>
               <a id="tm" href="/TM/sv/tm001">01</a>
               <a id="move" href="/move/tackle">Tackle</a>
               <span id="span" class="type-icon">Grass</span>"#,
        );
        let target = LinkUnwrap::new(&["ent-name", "type-icon"], &["tm", "ability"])
            .target
            .unwrap();

        let matched: Vec<_> = crate::select::select(&doc, doc.root(), &target)
            .into_iter()
            .filter_map(|id| doc.attr(id, "id"))
            .collect();
        assert_eq!(matched, vec!["name", "tm"]);
        assert!(LinkUnwrap::new(&[], &[]).target.is_none());
    }
}
