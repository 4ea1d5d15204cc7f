//! Collapsible rule-tree navigator.
//!
//! [RuleTree] renders a navigable hierarchy of [crate::rule::RuleNode]s as
//! a flattened list of [TreeRow]s and implements the keyboard traversal
//! contract over it. The widget is headless: embedding shells (CLI, web)
//! draw the rows and dispatch the [TreeEvent]s it returns.
//!
//! Ownership follows the single-threaded UI model: the tree exclusively
//! owns its [ExpansionState] and focus cursor, and only ever reads the
//! shared [RuleIndex]. Selection is externally owned: it enters through
//! [RuleTree::set_selection] and leaves as [TreeEvent::Selected] intents.
//!
//! Sibling order here is lexicographic by `number` (stable). The viewer's
//! prev/next deliberately keeps the authored `children` order instead; see
//! [crate::viewer::siblings].

use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use crate::{event::TreeEvent, index::RuleIndex, rule::RuleId};

/// The set of currently-expanded node ids.
///
/// Owned and mutated only by the navigator. Membership is independent
/// per-node boolean state: toggling twice restores the original
/// membership, and revealing a selection only ever adds ids.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: BTreeSet<RuleId>,
}

impl ExpansionState {
    pub fn is_expanded(&self, id: &RuleId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: &RuleId) -> bool {
        self.expanded.insert(id.clone())
    }

    pub fn collapse(&mut self, id: &RuleId) -> bool {
        self.expanded.remove(id)
    }

    /// Flip membership; returns the new expanded state.
    pub fn toggle(&mut self, id: &RuleId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Union `ids` into the expansion set, never removing anything.
    pub fn reveal<I: IntoIterator<Item = RuleId>>(&mut self, ids: I) {
        self.expanded.extend(ids);
    }

    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.expanded.iter()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Per-row display state.
#[derive(EnumSetType, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFlag {
    /// Children are materialized below this row.
    Expanded,
    /// The roving focus cursor is on this row.
    Focused,
    /// Matches the externally-owned current selection.
    Selected,
    /// No expand affordance: childless, or at the max-depth cap.
    Leaf,
}

pub(crate) mod rowflag_list {
    use enumset::EnumSet;
    use serde::{ser::SerializeSeq, Deserializer, Serializer};

    use super::RowFlag;

    pub(crate) fn serialize<S: Serializer>(
        set: &EnumSet<RowFlag>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = ser.serialize_seq(Some(set.len()))?;
        for bit in set.iter() {
            seq.serialize_element(&bit)?;
        }
        seq.end()
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> core::result::Result<EnumSet<RowFlag>, D::Error> {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = EnumSet<RowFlag>;
            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(formatter, "A list of RowFlag values")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut accum = EnumSet::<RowFlag>::new();
                while let Some(val) = seq.next_element::<RowFlag>()? {
                    accum |= val;
                }
                Ok(accum)
            }
        }
        de.deserialize_seq(Visitor)
    }
}

/// One visible node in the flattened tree. A row is visible by
/// construction: its full ancestor chain is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRow {
    pub id: RuleId,
    /// Nesting depth relative to the rendered root(s), 0-based.
    pub depth: usize,
    #[serde(with = "rowflag_list")]
    pub flags: EnumSet<RowFlag>,
}

impl TreeRow {
    pub fn is(&self, flag: RowFlag) -> bool {
        self.flags.contains(flag)
    }
}

/// Keyboard inputs understood by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Home,
    End,
}

impl TreeKey {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(TreeKey::Up),
            "ArrowDown" => Some(TreeKey::Down),
            "ArrowLeft" => Some(TreeKey::Left),
            "ArrowRight" => Some(TreeKey::Right),
            "Enter" => Some(TreeKey::Enter),
            " " | "Spacebar" => Some(TreeKey::Space),
            "Home" => Some(TreeKey::Home),
            "End" => Some(TreeKey::End),
            _ => None,
        }
    }
}

/// The rule tree navigator.
///
/// Renders either the whole forest of `level == 0` nodes or the subtree
/// under one root, and owns the expansion/focus state machine. All
/// collaborators are injected: the index is passed at construction and the
/// current selection arrives via [RuleTree::set_selection].
#[derive(Debug, Clone)]
pub struct RuleTree {
    index: Arc<RuleIndex>,
    root: Option<RuleId>,
    max_depth: Option<usize>,
    expansion: ExpansionState,
    focused: Option<RuleId>,
    selected: Option<RuleId>,
    /// Memo of the last selection processed by [RuleTree::set_selection];
    /// the ancestor reveal runs at most once per distinct value.
    last_synced: Option<RuleId>,
}

impl RuleTree {
    /// `root`: render the subtree rooted there instead of the whole
    /// forest. `max_depth`: hard cap on materialized nesting; nodes at
    /// that depth are leaves and deeper nodes are never produced.
    pub fn new(index: Arc<RuleIndex>, root: Option<RuleId>, max_depth: Option<usize>) -> Self {
        let mut expansion = ExpansionState::default();
        match &root {
            Some(id) => {
                expansion.expand(id);
            }
            None => {
                expansion.reveal(index.roots().to_vec());
            }
        }
        RuleTree {
            index,
            root,
            max_depth,
            expansion,
            focused: None,
            selected: None,
            last_synced: None,
        }
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selected(&self) -> Option<&RuleId> {
        self.selected.as_ref()
    }

    pub fn focused(&self) -> Option<&RuleId> {
        self.focused.as_ref()
    }

    /// The one row reachable via Tab (roving tabindex): the current
    /// selection when visible, otherwise the first visible row.
    pub fn tab_stop(&self) -> Option<RuleId> {
        let rows = self.rows();
        self.tab_stop_position(&rows).map(|p| rows[p].id.clone())
    }

    /// Selection-changed reducer.
    ///
    /// Mirrors the externally-owned current selection into the tree:
    /// unions the new selection's ancestor chain into the expansion state
    /// (auto-expand-to-selection) and moves the focus cursor there. Gated
    /// by a last-processed memo so the reveal runs once per distinct id,
    /// not once per render. An id missing from the index is memoized and
    /// otherwise ignored.
    pub fn set_selection(&mut self, current: Option<&RuleId>) {
        match current {
            None => {
                self.selected = None;
                self.last_synced = None;
            }
            Some(id) => {
                if self.last_synced.as_ref() == Some(id) {
                    return;
                }
                self.last_synced = Some(id.clone());
                self.selected = Some(id.clone());
                if self.index.contains(id) {
                    self.expansion.reveal(self.index.ancestors(id));
                    self.focused = Some(id.clone());
                } else {
                    tracing::debug!("selection '{id}' not in index; auto-expand skipped");
                }
            }
        }
    }

    /// Expand every node that has children. Rendering still honors the
    /// max-depth cap. Used by non-interactive shells that print the whole
    /// hierarchy at once.
    pub fn expand_all(&mut self) {
        let ids: Vec<RuleId> = self
            .index
            .iter()
            .filter(|node| !node.children.is_empty())
            .map(|node| node.id.clone())
            .collect();
        self.expansion.reveal(ids);
    }

    /// Explicit expand/collapse toggle (the disclosure control). Flips
    /// membership only; never navigates, never selects.
    pub fn toggle(&mut self, id: &RuleId) -> Option<TreeEvent> {
        if !self.index.contains(id) {
            return None;
        }
        let open = self.expansion.toggle(id);
        Some(TreeEvent::Toggled(id.clone(), open))
    }

    /// Activation (click or Enter): always a navigation intent, never an
    /// implicit toggle.
    pub fn select(&mut self, id: &RuleId) -> Option<TreeEvent> {
        if !self.index.contains(id) {
            return None;
        }
        self.focused = Some(id.clone());
        Some(TreeEvent::Selected(id.clone()))
    }

    /// Flatten the tree into its visible rows, preorder.
    ///
    /// A node is emitted iff every ancestor up to the rendered root is
    /// expanded. Children at the `max_depth` cap are never materialized. A
    /// missing root renders nothing. The walk carries a visited set so a
    /// malformed cyclic dataset terminates.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let seeds: Vec<RuleId> = match &self.root {
            Some(id) if self.index.contains(id) => vec![id.clone()],
            Some(_) => return rows,
            None => self.index.roots().to_vec(),
        };

        let mut visited: HashSet<RuleId> = HashSet::new();
        let mut stack: Vec<(RuleId, usize)> =
            seeds.into_iter().rev().map(|id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let children = self.index.sorted_children(&id);
            let capped = self.max_depth.is_some_and(|cap| depth >= cap);
            let leaf = capped || children.is_empty();
            let expanded = !leaf && self.expansion.is_expanded(&id);

            let mut flags = EnumSet::new();
            if leaf {
                flags |= RowFlag::Leaf;
            }
            if expanded {
                flags |= RowFlag::Expanded;
            }
            if self.selected.as_ref() == Some(&id) {
                flags |= RowFlag::Selected;
            }
            if self.focused.as_ref() == Some(&id) {
                flags |= RowFlag::Focused;
            }
            rows.push(TreeRow {
                id: id.clone(),
                depth,
                flags,
            });

            if expanded {
                for child in children.iter().rev() {
                    stack.push((child.id.clone(), depth + 1));
                }
            }
        }
        rows
    }

    /// Apply one keyboard input to the focus/expansion state machine.
    ///
    /// Returns the action the shell should dispatch, if any. When focus
    /// has not yet entered the tree, it enters at the tab stop before the
    /// key applies.
    pub fn handle_key(&mut self, key: TreeKey) -> Option<TreeEvent> {
        let rows = self.rows();
        if rows.is_empty() {
            return None;
        }
        let pos = self
            .focused
            .as_ref()
            .and_then(|focused| rows.iter().position(|row| &row.id == focused))
            .or_else(|| self.tab_stop_position(&rows))?;

        match key {
            TreeKey::Down => self.move_focus(&rows, pos, pos.saturating_add(1).min(rows.len() - 1)),
            TreeKey::Up => self.move_focus(&rows, pos, pos.saturating_sub(1)),
            TreeKey::Home => self.move_focus(&rows, pos, 0),
            TreeKey::End => self.move_focus(&rows, pos, rows.len() - 1),
            TreeKey::Right => {
                let row = &rows[pos];
                if row.is(RowFlag::Leaf) {
                    self.refocus(row.id.clone());
                    None
                } else if !row.is(RowFlag::Expanded) {
                    self.refocus(row.id.clone());
                    self.expansion.expand(&row.id);
                    Some(TreeEvent::Toggled(row.id.clone(), true))
                } else {
                    // Expanded with children: in preorder the first child
                    // is the next row.
                    self.move_focus(&rows, pos, pos + 1)
                }
            }
            TreeKey::Left => {
                let row = &rows[pos];
                if row.is(RowFlag::Expanded) {
                    self.refocus(row.id.clone());
                    self.expansion.collapse(&row.id);
                    Some(TreeEvent::Toggled(row.id.clone(), false))
                } else {
                    let parent = self
                        .index
                        .get(&row.id)
                        .and_then(|node| node.parent_id.clone())?;
                    rows.iter().position(|r| r.id == parent).and_then(|target| {
                        self.move_focus(&rows, pos, target)
                    })
                }
            }
            TreeKey::Enter => {
                let id = rows[pos].id.clone();
                self.refocus(id.clone());
                Some(TreeEvent::Selected(id))
            }
            TreeKey::Space => {
                let id = rows[pos].id.clone();
                self.refocus(id.clone());
                let open = self.expansion.toggle(&id);
                Some(TreeEvent::Toggled(id, open))
            }
        }
    }

    fn tab_stop_position(&self, rows: &[TreeRow]) -> Option<usize> {
        if rows.is_empty() {
            return None;
        }
        self.selected
            .as_ref()
            .and_then(|selected| rows.iter().position(|row| &row.id == selected))
            .or(Some(0))
    }

    fn refocus(&mut self, id: RuleId) {
        self.focused = Some(id);
    }

    fn move_focus(&mut self, rows: &[TreeRow], from: usize, to: usize) -> Option<TreeEvent> {
        let id = rows[to].id.clone();
        let moved = from != to || self.focused.as_ref() != Some(&id);
        self.refocus(id.clone());
        if moved {
            Some(TreeEvent::Focused(id))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_membership() {
        let mut state = ExpansionState::default();
        let id = RuleId::new("100");
        state.expand(&RuleId::new("200"));
        let before = state.clone();
        state.toggle(&id);
        state.toggle(&id);
        assert_eq!(state, before);
        // And from the expanded side.
        state.expand(&id);
        let before = state.clone();
        state.toggle(&id);
        state.toggle(&id);
        assert_eq!(state, before);
    }

    #[test]
    fn reveal_only_adds() {
        let mut state = ExpansionState::default();
        state.expand(&RuleId::new("100"));
        state.reveal([RuleId::new("200"), RuleId::new("300")]);
        assert_eq!(state.len(), 3);
        assert!(state.is_expanded(&RuleId::new("100")));
    }

    #[test]
    fn row_flags_serialize_as_names() {
        let row = TreeRow {
            id: RuleId::new("100"),
            depth: 1,
            flags: RowFlag::Expanded | RowFlag::Selected,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json["flags"],
            serde_json::json!(["expanded", "selected"])
        );
        let back: TreeRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn dom_key_names_map_to_tree_keys() {
        assert_eq!(TreeKey::from_dom_key("ArrowDown"), Some(TreeKey::Down));
        assert_eq!(TreeKey::from_dom_key(" "), Some(TreeKey::Space));
        assert_eq!(TreeKey::from_dom_key("PageDown"), None);
    }
}
