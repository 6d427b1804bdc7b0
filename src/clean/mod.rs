//! Tree cleaning passes.
//!
//! All passes mutate the document in place and run to completion before
//! the next one starts.
//!
//! ## Pipeline Order
//!
//! 1. **Prune** - Remove policy selectors, labeled rows, prose paragraphs,
//!    sibling runs
//! 2. **Rewrite** - Icons and links become text, headings shift down a level
//! 3. **Layout** - Tag move-list containers for two-column rendering

mod layout;
mod prune;
mod rewrite;

pub use layout::mark_two_column;
pub use prune::{
    PruneReport, prune, remove_imageless_paragraphs, remove_labeled_rows, remove_matching,
    remove_sibling_run,
};
pub use rewrite::{RewriteReport, rewrite, shift_headings, substitute_icons, unwrap_links};

use crate::dom::Document;
use crate::policy::Policy;

/// What the cleaning passes changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub prune: PruneReport,
    pub rewrite: RewriteReport,
    pub two_column: usize,
}

/// Run all cleaning passes on a document.
pub fn clean(doc: &mut Document, policy: &Policy) -> CleanReport {
    let prune = prune(doc, policy);
    log::debug!(
        "pruned {} subtrees ({} by selector, {} rows, {} paragraphs, {} in sibling runs)",
        prune.total(),
        prune.by_selector,
        prune.labeled_rows,
        prune.paragraphs,
        prune.sibling_runs
    );

    let rewrite = rewrite(doc, policy);
    log::debug!(
        "rewrote {} icons, {} links, {} headings",
        rewrite.icons,
        rewrite.links,
        rewrite.headings
    );

    let two_column = mark_two_column(doc, &policy.two_column);
    log::debug!("tagged {two_column} two-column containers");

    CleanReport {
        prune,
        rewrite,
        two_column,
    }
}
