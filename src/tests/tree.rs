//! Navigator behavior: rendering bounds, expansion state, auto-expand,
//! and the keyboard contract.

use std::collections::BTreeSet;

use super::helpers::{node, sample_index};
use crate::{
    event::TreeEvent,
    index::RuleIndex,
    rule::RuleId,
    tree::{RowFlag, RuleTree, TreeKey},
};

fn row_ids(tree: &RuleTree) -> Vec<String> {
    tree.rows().iter().map(|row| row.id.to_string()).collect()
}

#[test]
fn fully_expanded_tree_renders_every_reachable_node() {
    let index = sample_index();
    let mut tree = RuleTree::new(index.clone(), None, None);
    tree.expand_all();

    let rendered: BTreeSet<RuleId> = tree.rows().into_iter().map(|row| row.id).collect();
    let mut reachable: BTreeSet<RuleId> = BTreeSet::new();
    for root in index.roots() {
        reachable.extend(index.subtree(root, None));
    }
    assert_eq!(rendered, reachable);
}

#[test]
fn max_depth_caps_materialization_exactly() {
    let index = sample_index();
    let mut tree = RuleTree::new(index.clone(), None, Some(1));
    tree.expand_all();

    let rendered: BTreeSet<RuleId> = tree.rows().into_iter().map(|row| row.id).collect();
    let mut expected: BTreeSet<RuleId> = BTreeSet::new();
    for root in index.roots() {
        expected.extend(index.subtree(root, Some(1)));
    }
    // No node beyond the bound, none within it omitted.
    assert_eq!(rendered, expected);
    assert!(!rendered.contains(&RuleId::new("103.1.a")));

    // A capped node with real children renders as a leaf.
    let rows = tree.rows();
    let capped = rows
        .iter()
        .find(|row| row.id == RuleId::new("601.2"))
        .unwrap();
    assert!(capped.is(RowFlag::Leaf));
    assert!(!capped.is(RowFlag::Expanded));
}

#[test]
fn rooted_tree_renders_subtree_and_unknown_root_renders_nothing() {
    let index = sample_index();
    let mut rooted = RuleTree::new(index.clone(), Some(RuleId::new("103")), None);
    rooted.expand_all();
    assert_eq!(
        row_ids(&rooted),
        vec!["103", "103.1", "103.1.a", "103.1.b"]
    );

    let missing = RuleTree::new(index, Some(RuleId::new("999")), None);
    assert!(missing.rows().is_empty());
}

#[test]
fn siblings_render_in_number_order() {
    let (index, _) = RuleIndex::from_nodes(vec![
        node("100", 0, None, &["100.3", "100.1", "100.2"]),
        node("100.3", 1, Some("100"), &[]),
        node("100.1", 1, Some("100"), &[]),
        node("100.2", 1, Some("100"), &[]),
    ]);
    let tree = RuleTree::new(std::sync::Arc::new(index), None, None);
    assert_eq!(row_ids(&tree), vec!["100", "100.1", "100.2", "100.3"]);
}

#[test]
fn toggle_is_selection_free_and_double_toggle_restores_state() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    let before = tree.expansion().clone();
    let id = RuleId::new("103");

    let first = tree.toggle(&id);
    assert_eq!(first, Some(TreeEvent::Toggled(id.clone(), false)));
    let second = tree.toggle(&id);
    assert_eq!(second, Some(TreeEvent::Toggled(id.clone(), true)));
    assert_eq!(tree.expansion(), &before);
    assert_eq!(tree.selected(), None);
}

#[test]
fn auto_expand_reveals_every_ancestor_once() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    let deep = RuleId::new("103.1.a");

    tree.set_selection(Some(&deep));
    assert!(tree.expansion().is_expanded(&RuleId::new("103")));
    assert!(tree.expansion().is_expanded(&RuleId::new("103.1")));

    // The reveal is memoized per distinct selection: collapsing by hand
    // and re-announcing the same selection must not re-expand.
    tree.toggle(&RuleId::new("103.1"));
    tree.set_selection(Some(&deep));
    assert!(!tree.expansion().is_expanded(&RuleId::new("103.1")));

    // A different selection runs the reveal again.
    tree.set_selection(Some(&RuleId::new("103.1.b")));
    assert!(tree.expansion().is_expanded(&RuleId::new("103.1")));
}

#[test]
fn selecting_a_nested_rule_reveals_its_siblings() {
    // Concrete scenario: selecting 100.2 expands 100, showing both
    // children.
    let (index, _) = RuleIndex::from_nodes(vec![
        node("100", 0, None, &["100.1", "100.2"]),
        node("100.1", 1, Some("100"), &[]),
        node("100.2", 1, Some("100"), &[]),
    ]);
    let mut tree = RuleTree::new(std::sync::Arc::new(index), None, None);
    // Forest roots start expanded; collapse to prove the reveal does it.
    tree.toggle(&RuleId::new("100"));
    tree.set_selection(Some(&RuleId::new("100.2")));

    assert!(tree.expansion().is_expanded(&RuleId::new("100")));
    let ids = row_ids(&tree);
    assert!(ids.contains(&"100.1".to_string()));
    assert!(ids.contains(&"100.2".to_string()));
}

#[test]
fn unknown_selection_is_ignored_without_error() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    let before = tree.expansion().clone();
    tree.set_selection(Some(&RuleId::new("999")));
    assert_eq!(tree.expansion(), &before);
    // Still recorded as the highlight target, matching no row.
    assert_eq!(tree.selected(), Some(&RuleId::new("999")));
    assert!(tree.rows().iter().all(|row| !row.is(RowFlag::Selected)));
}

#[test]
fn tab_stop_is_selection_or_first_row() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    assert_eq!(tree.tab_stop(), Some(RuleId::new("100")));

    tree.set_selection(Some(&RuleId::new("103.1")));
    assert_eq!(tree.tab_stop(), Some(RuleId::new("103.1")));
}

#[test]
fn vertical_keys_walk_visible_rows() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    // Roots start expanded; deeper nodes stay collapsed.
    assert_eq!(
        row_ids(&tree),
        vec!["100", "100.1", "100.2", "103", "103.1", "601", "601.2"]
    );

    // Focus enters at the tab stop (first row), then Down moves once per
    // press through document order.
    assert_eq!(
        tree.handle_key(TreeKey::Down),
        Some(TreeEvent::Focused(RuleId::new("100.1")))
    );
    assert_eq!(
        tree.handle_key(TreeKey::Down),
        Some(TreeEvent::Focused(RuleId::new("100.2")))
    );
    assert_eq!(
        tree.handle_key(TreeKey::Down),
        Some(TreeEvent::Focused(RuleId::new("103")))
    );

    assert_eq!(
        tree.handle_key(TreeKey::End),
        Some(TreeEvent::Focused(RuleId::new("601.2")))
    );
    // Bottom edge: no movement, no event.
    assert_eq!(tree.handle_key(TreeKey::Down), None);

    assert_eq!(
        tree.handle_key(TreeKey::Up),
        Some(TreeEvent::Focused(RuleId::new("601")))
    );
    assert_eq!(
        tree.handle_key(TreeKey::Home),
        Some(TreeEvent::Focused(RuleId::new("100")))
    );
    // Top edge: no movement, no event.
    assert_eq!(tree.handle_key(TreeKey::Up), None);
}

#[test]
fn right_expands_then_descends_and_left_mirrors() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    tree.set_selection(Some(&RuleId::new("103")));

    // 103 starts expanded (root policy); collapse it first.
    tree.handle_key(TreeKey::Left);
    assert!(!tree.expansion().is_expanded(&RuleId::new("103")));

    // Right on collapsed: expand, focus stays.
    assert_eq!(
        tree.handle_key(TreeKey::Right),
        Some(TreeEvent::Toggled(RuleId::new("103"), true))
    );
    assert_eq!(tree.focused(), Some(&RuleId::new("103")));

    // Right on expanded: descend to first child.
    assert_eq!(
        tree.handle_key(TreeKey::Right),
        Some(TreeEvent::Focused(RuleId::new("103.1")))
    );

    // Left on a collapsed node: ascend to the parent.
    assert_eq!(
        tree.handle_key(TreeKey::Left),
        Some(TreeEvent::Focused(RuleId::new("103")))
    );
    // Left on the expanded parent: collapse without moving.
    assert_eq!(
        tree.handle_key(TreeKey::Left),
        Some(TreeEvent::Toggled(RuleId::new("103"), false))
    );
    assert_eq!(tree.focused(), Some(&RuleId::new("103")));
    // Left on a collapsed root: nowhere to go.
    assert_eq!(tree.handle_key(TreeKey::Left), None);
}

#[test]
fn right_on_leaf_does_nothing() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    tree.set_selection(Some(&RuleId::new("100.1")));
    assert_eq!(tree.handle_key(TreeKey::Right), None);
}

#[test]
fn enter_selects_and_space_toggles_without_selecting() {
    let index = sample_index();
    let mut tree = RuleTree::new(index, None, None);
    tree.set_selection(Some(&RuleId::new("103")));

    assert_eq!(
        tree.handle_key(TreeKey::Enter),
        Some(TreeEvent::Selected(RuleId::new("103")))
    );

    let before_selected = tree.selected().cloned();
    assert_eq!(
        tree.handle_key(TreeKey::Space),
        Some(TreeEvent::Toggled(RuleId::new("103"), false))
    );
    assert_eq!(tree.selected().cloned(), before_selected);
    assert_eq!(
        tree.handle_key(TreeKey::Space),
        Some(TreeEvent::Toggled(RuleId::new("103"), true))
    );
}

#[test]
fn keyboard_on_empty_tree_is_inert() {
    let (index, _) = RuleIndex::from_nodes(Vec::new());
    let mut tree = RuleTree::new(std::sync::Arc::new(index), None, None);
    assert!(tree.rows().is_empty());
    assert_eq!(tree.handle_key(TreeKey::Down), None);
    assert_eq!(tree.handle_key(TreeKey::Enter), None);
}

#[test]
fn cyclic_children_lists_terminate() {
    // a and b list each other; parent_id agrees, so the edges survive
    // resolution. The flatten must still terminate.
    let a = node("a", 0, Some("b"), &["b"]);
    let b = node("b", 1, Some("a"), &["a"]);
    let (index, _) = RuleIndex::from_nodes(vec![a, b]);
    let mut tree = RuleTree::new(std::sync::Arc::new(index), None, None);
    tree.expand_all();
    let ids = row_ids(&tree);
    assert!(ids.len() <= 2, "cycle must not duplicate rows: {ids:?}");
}
