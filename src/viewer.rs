//! Rule detail viewer.
//!
//! Given one selected rule and the shared [RuleIndex], computes everything
//! the detail pane renders: the root-to-node breadcrumb trail, the content
//! split into navigable [Segment]s, ordered sibling prev/next targets, and
//! the cross-reference listings in both directions.
//!
//! Sibling prev/next uses the parent's authored `children` order, NOT the
//! tree navigator's lexicographic sort. The two orderings are kept
//! independently correct on purpose; see DESIGN.md.

use serde::{Deserialize, Serialize};

use crate::{
    crossref::{resolve_refs, Segment},
    index::RuleIndex,
    rule::{RuleId, RuleNode},
};

/// Breadcrumb label used when no configuration overrides it.
pub const DEFAULT_HOME_LABEL: &str = "Rules";

/// One breadcrumb entry. The fixed home entry has no target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub label: String,
    pub target: Option<RuleId>,
}

/// Lightweight summary of a rule, used for sibling and cross-reference
/// listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRef {
    pub id: RuleId,
    pub number: String,
    pub title: String,
}

impl From<&RuleNode> for RuleRef {
    fn from(node: &RuleNode) -> Self {
        RuleRef {
            id: node.id.clone(),
            number: node.number.clone(),
            title: node.title.clone(),
        }
    }
}

/// Root-to-node breadcrumb trail for `id`, with the fixed `home_label`
/// entry always first.
///
/// Walks `parent_id` upward from the selected node. The walk is
/// cycle-guarded (see [RuleIndex::ancestors]): a malformed chain truncates
/// the trail instead of looping. An id missing from the index yields just
/// the home entry.
pub fn breadcrumbs(index: &RuleIndex, id: &RuleId, home_label: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: home_label.to_string(),
        target: None,
    }];
    let Some(node) = index.get(id) else {
        return crumbs;
    };

    let mut chain = index.ancestors(id);
    chain.reverse();
    for ancestor in &chain {
        if let Some(ancestor_node) = index.get(ancestor) {
            crumbs.push(Crumb {
                label: ancestor_node.label(),
                target: Some(ancestor_node.id.clone()),
            });
        }
    }
    crumbs.push(Crumb {
        label: node.label(),
        target: Some(node.id.clone()),
    });
    crumbs
}

/// Ordered sibling prev/next for `id`, in the parent's authored
/// `children` order (dangling entries skipped). First/last entries have no
/// previous/next; nodes without a parent have neither.
pub fn siblings<'a>(
    index: &'a RuleIndex,
    id: &RuleId,
) -> (Option<&'a RuleNode>, Option<&'a RuleNode>) {
    let Some(node) = index.get(id) else {
        return (None, None);
    };
    let Some(parent) = &node.parent_id else {
        return (None, None);
    };
    let ordered = index.children(parent);
    let Some(pos) = ordered.iter().position(|sibling| &sibling.id == id) else {
        return (None, None);
    };
    let previous = pos.checked_sub(1).map(|p| ordered[p]);
    let next = ordered.get(pos + 1).copied();
    (previous, next)
}

/// Everything the detail pane needs for one rule, render-ready and
/// serializable for the CLI/WASM surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleView {
    pub node: RuleNode,
    pub breadcrumbs: Vec<Crumb>,
    /// `content` resolved into text/link segments; concatenating their
    /// visible text reproduces `node.content` exactly.
    pub segments: Vec<Segment>,
    pub previous: Option<RuleRef>,
    pub next: Option<RuleRef>,
    pub cross_refs: Vec<RuleRef>,
    pub referenced_by: Vec<RuleRef>,
}

/// Assemble the full view for `id`, or `None` if it is not in the index.
pub fn view(index: &RuleIndex, id: &RuleId, home_label: &str) -> Option<RuleView> {
    let node = index.get(id)?.clone();
    let (previous, next) = siblings(index, id);
    let view = RuleView {
        breadcrumbs: breadcrumbs(index, id, home_label),
        segments: resolve_refs(&node.content, index),
        previous: previous.map(RuleRef::from),
        next: next.map(RuleRef::from),
        cross_refs: index.cross_refs(id).into_iter().map(RuleRef::from).collect(),
        referenced_by: index
            .referenced_by(id)
            .into_iter()
            .map(RuleRef::from)
            .collect(),
        node,
    };
    Some(view)
}
