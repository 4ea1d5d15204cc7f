//! [RuleIndex] is the id→[RuleNode] lookup table backing all navigation.
//!
//! The index is built once from an externally produced node list and is
//! read-only afterwards; the tree navigator and viewer only ever borrow
//! it. Construction tolerates inconsistent datasets (dangling references,
//! duplicate ids, parent/child disagreements) by skipping the offending
//! entries and reporting [LoadDiagnostic]s. Lookups never panic and never
//! surface errors.

use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet},
    hash::Hash,
};

use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    codec::diagnostic::LoadDiagnostic,
    rule::{RuleId, RuleNode},
};

/// Edge kinds in the relation graph.
///
/// `Section` edges carry the parent→child hierarchy; `Reference` edges
/// carry non-hierarchical cross-references and power backlink queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    Section,
    Reference,
}

#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    nodes: HashMap<RuleId, RuleNode>,
    /// `level == 0` nodes, sorted lexicographically by number (stable).
    roots: Vec<RuleId>,
    relations: DiGraph<RuleId, RelationKind>,
    graph_ids: HashMap<RuleId, NodeIndex>,
    revision: String,
}

impl RuleIndex {
    /// Build an index from a node sequence.
    ///
    /// Never fails: inconsistencies are skipped and returned as
    /// diagnostics. Duplicate ids keep the first definition.
    pub fn from_nodes<I>(nodes: I) -> (Self, Vec<LoadDiagnostic>)
    where
        I: IntoIterator<Item = RuleNode>,
    {
        let mut diagnostics = Vec::new();
        let mut map: HashMap<RuleId, RuleNode> = HashMap::new();
        let mut order: Vec<RuleId> = Vec::new();

        for node in nodes {
            if node.id.is_empty() {
                diagnostics.push(LoadDiagnostic::EmptyId {
                    label: node.label(),
                });
                continue;
            }
            if map.contains_key(&node.id) {
                diagnostics.push(LoadDiagnostic::DuplicateId {
                    id: node.id.clone(),
                });
                continue;
            }
            order.push(node.id.clone());
            map.insert(node.id.clone(), node);
        }

        let mut roots: Vec<RuleId> = order
            .iter()
            .filter(|id| map[*id].is_root())
            .cloned()
            .collect();
        // Stable sort: equal numbers keep dataset order.
        roots.sort_by(|a, b| map[a].sort_key().cmp(map[b].sort_key()));

        let mut relations = DiGraph::new();
        let mut graph_ids = HashMap::new();
        for id in &order {
            let idx = relations.add_node(id.clone());
            graph_ids.insert(id.clone(), idx);
        }

        for id in &order {
            let node = &map[id];
            if let Some(parent) = &node.parent_id {
                if !map.contains_key(parent) {
                    diagnostics.push(LoadDiagnostic::DanglingParent {
                        id: id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            for child in &node.children {
                match map.get(child) {
                    None => diagnostics.push(LoadDiagnostic::DanglingChild {
                        parent: id.clone(),
                        child: child.clone(),
                    }),
                    Some(resolved) if resolved.parent_id.as_ref() != Some(id) => {
                        diagnostics.push(LoadDiagnostic::ParentMismatch {
                            parent: id.clone(),
                            child: child.clone(),
                        });
                    }
                    Some(_) => {
                        relations.add_edge(
                            graph_ids[id],
                            graph_ids[child],
                            RelationKind::Section,
                        );
                    }
                }
            }
            for target in &node.cross_refs {
                if map.contains_key(target) {
                    relations.add_edge(
                        graph_ids[id],
                        graph_ids[target],
                        RelationKind::Reference,
                    );
                } else {
                    diagnostics.push(LoadDiagnostic::DanglingCrossRef {
                        id: id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!("dataset: {diagnostic}");
        }

        let revision = revision_digest(&map, &order);
        tracing::debug!(
            nodes = order.len(),
            roots = roots.len(),
            revision = revision.as_str(),
            "rule index built"
        );

        (
            RuleIndex {
                nodes: map,
                roots,
                relations,
                graph_ids,
                revision,
            },
            diagnostics,
        )
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&RuleNode>
    where
        RuleId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        RuleId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleNode> {
        self.nodes.values()
    }

    /// Top-level nodes in display order.
    pub fn roots(&self) -> &[RuleId] {
        &self.roots
    }

    /// Hex-encoded content digest of the loaded dataset. Two indexes with
    /// the same digest hold the same rules.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Direct children in authored order. Entries that do not resolve, or
    /// whose `parent_id` disagrees with `id`, are skipped.
    pub fn children(&self, id: &RuleId) -> Vec<&RuleNode> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .filter(|child| child.parent_id.as_ref() == Some(id))
            .collect()
    }

    /// Direct children sorted lexicographically by number (stable over the
    /// authored order for equal keys). This is the tree navigator's
    /// sibling order; the viewer's prev/next deliberately does NOT use it.
    pub fn sorted_children(&self, id: &RuleId) -> Vec<&RuleNode> {
        let mut children = self.children(id);
        children.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        children
    }

    /// Strict ancestor chain of `id`, nearest parent first.
    ///
    /// The walk is cycle-guarded by a visited set and additionally bounded
    /// by the node count, so it terminates on any dataset. A dangling
    /// parent reference ends the chain silently.
    pub fn ancestors(&self, id: &RuleId) -> Vec<RuleId> {
        let mut path = Vec::new();
        let mut visited: HashSet<&RuleId> = HashSet::new();
        visited.insert(id);

        let mut cursor = self.nodes.get(id);
        while let Some(node) = cursor {
            if path.len() > self.nodes.len() {
                break;
            }
            let Some(parent) = &node.parent_id else {
                break;
            };
            if !visited.insert(parent) {
                tracing::warn!("cyclic parent chain detected at '{parent}'; truncating");
                break;
            }
            match self.nodes.get(parent) {
                Some(parent_node) => {
                    path.push(parent_node.id.clone());
                    cursor = Some(parent_node);
                }
                None => break,
            }
        }
        path
    }

    /// Ids reachable from `root` through valid child edges, in sorted
    /// sibling order, `root` first. `max_depth` caps materialization:
    /// nodes at that depth are treated as leaves.
    pub fn subtree(&self, root: &RuleId, max_depth: Option<usize>) -> Vec<RuleId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut visited: HashSet<RuleId> = HashSet::new();
        let mut stack: Vec<(RuleId, usize)> = vec![(root.clone(), 0)];
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            out.push(id.clone());
            if max_depth.is_some_and(|cap| depth >= cap) {
                continue;
            }
            let children = self.sorted_children(&id);
            for child in children.iter().rev() {
                stack.push((child.id.clone(), depth + 1));
            }
        }
        out
    }

    /// Resolved cross-references in authored order; dangling entries are
    /// skipped.
    pub fn cross_refs(&self, id: &RuleId) -> Vec<&RuleNode> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.cross_refs
            .iter()
            .filter_map(|target| self.nodes.get(target))
            .collect()
    }

    /// Rules whose `cross_refs` mention `id` (backlinks), in display
    /// order. Computed from the relation graph's incoming `Reference`
    /// edges.
    pub fn referenced_by(&self, id: &RuleId) -> Vec<&RuleNode> {
        let Some(idx) = self.graph_ids.get(id) else {
            return Vec::new();
        };
        let mut sources: Vec<&RuleNode> = self
            .relations
            .edges_directed(*idx, Direction::Incoming)
            .filter(|edge| *edge.weight() == RelationKind::Reference)
            .filter_map(|edge| {
                let source = &self.relations[edge.source()];
                self.nodes.get(source)
            })
            .collect();
        sources.sort_by(|a, b| a.sort_key().cmp(b.sort_key()).then(a.id.cmp(&b.id)));
        sources.dedup_by(|a, b| a.id == b.id);
        sources
    }
}

fn revision_digest(map: &HashMap<RuleId, RuleNode>, order: &[RuleId]) -> String {
    let mut sorted: Vec<&RuleId> = order.iter().collect();
    sorted.sort();
    let mut hasher = Sha256::new();
    for id in sorted {
        let node = &map[id];
        for field in [
            node.id.as_str(),
            &node.number,
            &node.title,
            &node.content,
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0xff]);
        }
        hasher.update([node.level, 0xff]);
        if let Some(parent) = &node.parent_id {
            hasher.update(parent.as_str().as_bytes());
        }
        hasher.update([0xff]);
        for child in &node.children {
            hasher.update(child.as_str().as_bytes());
            hasher.update([0xfe]);
        }
        for target in &node.cross_refs {
            hasher.update(target.as_str().as_bytes());
            hasher.update([0xfd]);
        }
    }
    hex::encode(hasher.finalize())
}
