//! # rulebound-core
//!
//! The navigation core of Rule Bound, an accessible rules-reference
//! application. This crate holds everything with real behavior behind the
//! UI: the rule hierarchy index, the collapsible tree navigator with its
//! keyboard state machine, breadcrumb construction, and inline
//! cross-reference resolution. Rendering is left to embedding shells (the
//! CLI binary, the web front end via the `wasm` feature).
//!
//! ## Overview
//!
//! A rulebook dataset is a flat set of [`rule::RuleNode`] records keyed by
//! opaque string ids, with an authored parent/child hierarchy and
//! non-hierarchical cross-references. The [`codec`] module decodes
//! datasets (JSON, TOML, Markdown rulebooks) into a read-only
//! [`index::RuleIndex`]; [`tree::RuleTree`] and [`viewer`] only ever read
//! that index and are handed it explicitly, never through an ambient
//! store.
//!
//! Dataset inconsistencies (dangling references, duplicate ids) are
//! tolerated everywhere: load reports [`codec::LoadDiagnostic`]s, lookups
//! skip what they cannot resolve, and no traversal can loop or panic on
//! malformed data.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rulebound_core::{
//!     index::RuleIndex,
//!     rule::{RuleId, RuleNode},
//!     tree::RuleTree,
//!     viewer,
//! };
//!
//! let nodes = vec![
//!     RuleNode {
//!         id: RuleId::new("100"),
//!         number: "100.".to_string(),
//!         title: "Starting the Game".to_string(),
//!         children: vec![RuleId::new("100.1")],
//!         ..Default::default()
//!     },
//!     RuleNode {
//!         id: RuleId::new("100.1"),
//!         number: "100.1.".to_string(),
//!         title: "Opening Hands".to_string(),
//!         level: 1,
//!         parent_id: Some(RuleId::new("100")),
//!         ..Default::default()
//!     },
//! ];
//! let (index, diagnostics) = RuleIndex::from_nodes(nodes);
//! assert!(diagnostics.is_empty());
//!
//! // The tree owns expansion/focus state; selection is routed in.
//! let index = Arc::new(index);
//! let mut tree = RuleTree::new(index.clone(), None, None);
//! tree.set_selection(Some(&RuleId::new("100.1")));
//! assert_eq!(tree.rows().len(), 2);
//!
//! // The viewer assembles breadcrumbs, resolved content, and siblings.
//! let view = viewer::view(&index, &RuleId::new("100.1"), "Rules").unwrap();
//! assert_eq!(view.breadcrumbs.len(), 3);
//! ```
//!
//! ## Keyboard contract
//!
//! [`tree::RuleTree::handle_key`] implements the roving-tabindex tree
//! pattern: Up/Down move through visible rows, Right expands or descends,
//! Left collapses or ascends, Enter emits a navigation intent, Space
//! toggles expansion, Home/End jump to the ends. Only the tab stop
//! ([`tree::RuleTree::tab_stop`]) sits in the natural tab order; the
//! embedding shell dispatches the returned [`event::TreeEvent`]s.
//!
//! ## Module Guide
//!
//! - [`rule`]: node records, ids, and the level→style table
//! - [`index`]: the id→node lookup table and relation graph
//! - [`tree`]: expansion state and the keyboard navigator
//! - [`viewer`]: breadcrumbs, sibling navigation, detail assembly
//! - [`crossref`]: inline rule-number mention resolution
//! - [`codec`]: dataset decoding and load diagnostics
//! - [`search`]: normalized ranked search over the index
//! - [`config`]: shell configuration defaults
//!
//! ## Features
//!
//! - **bin**: the `rulebound` CLI (tree/show/search/check)
//! - **stemming**: English stemming in search normalization
//! - **wasm**: browser bindings for the web shell

pub mod codec;
pub mod config;
pub mod crossref;
pub mod error;
pub mod event;
pub mod index;
pub mod rule;
pub mod search;
#[cfg(test)]
mod tests;
pub mod tree;
pub mod viewer;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::*;
