//! Shared fixtures: a small comprehensive-rules-shaped dataset.

use std::sync::Arc;

use crate::{
    index::RuleIndex,
    rule::{RuleId, RuleNode},
};

pub fn node(id: &str, level: u8, parent: Option<&str>, children: &[&str]) -> RuleNode {
    RuleNode {
        id: RuleId::new(id),
        number: format!("{id}."),
        title: format!("Rule {id}"),
        level,
        parent_id: parent.map(RuleId::new),
        children: children.iter().map(|c| RuleId::new(*c)).collect(),
        ..Default::default()
    }
}

/// Three top-level sections, nesting down to clause depth, with one
/// content cross-reference (100.2 → 103.1.a) and one structured
/// cross-reference (103.1.a → 100.2).
pub fn sample_nodes() -> Vec<RuleNode> {
    let mut nodes = vec![
        node("100", 0, None, &["100.1", "100.2"]),
        node("100.1", 1, Some("100"), &[]),
        node("100.2", 1, Some("100"), &[]),
        node("103", 0, None, &["103.1"]),
        node("103.1", 1, Some("103"), &["103.1.a", "103.1.b"]),
        node("103.1.a", 2, Some("103.1"), &[]),
        node("103.1.b", 2, Some("103.1"), &[]),
        node("601", 0, None, &["601.2"]),
        node("601.2", 1, Some("601"), &["601.2.a", "601.2.b", "601.2.c"]),
        node("601.2.a", 2, Some("601.2"), &[]),
        node("601.2.b", 2, Some("601.2"), &[]),
        node("601.2.c", 2, Some("601.2"), &[]),
    ];
    nodes[2].content = "See rule 103.1.a. for details".to_string();
    nodes[5].cross_refs = vec![RuleId::new("100.2")];
    nodes
}

pub fn sample_index() -> Arc<RuleIndex> {
    let (index, diagnostics) = RuleIndex::from_nodes(sample_nodes());
    assert!(
        diagnostics.is_empty(),
        "sample dataset must be consistent: {diagnostics:?}"
    );
    Arc::new(index)
}
