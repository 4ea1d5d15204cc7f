//! Browser bindings for the web shell (`wasm` feature).
//!
//! [RuleApp] wraps one loaded dataset plus its tree navigator behind a
//! wasm-bindgen surface. Values cross the boundary via serde: rows,
//! events, and views arrive in JS as plain objects. Keyboard input is
//! keyed by DOM `KeyboardEvent.key` names, so the shell can forward
//! events unchanged.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::{
    codec,
    error::RuleboundError,
    index::RuleIndex,
    rule::RuleId,
    search,
    tree::{RuleTree, TreeKey},
    viewer,
};

fn to_js(err: RuleboundError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct RuleApp {
    index: Arc<RuleIndex>,
    tree: RuleTree,
    home_label: String,
}

#[wasm_bindgen]
impl RuleApp {
    /// Build an app from a JSON dataset string. Load diagnostics are
    /// tolerated exactly as in the native shell.
    #[wasm_bindgen(constructor)]
    pub fn new(dataset_json: &str, home_label: Option<String>) -> Result<RuleApp, JsValue> {
        let nodes = codec::decode_str(dataset_json, "json").map_err(to_js)?;
        let (index, _diagnostics) = RuleIndex::from_nodes(nodes);
        let index = Arc::new(index);
        let tree = RuleTree::new(index.clone(), None, None);
        Ok(RuleApp {
            index,
            tree,
            home_label: home_label.unwrap_or_else(|| viewer::DEFAULT_HOME_LABEL.to_string()),
        })
    }

    pub fn revision(&self) -> String {
        self.index.revision().to_string()
    }

    /// The flattened visible rows, as an array of `{id, depth, flags}`.
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tree.rows()).map_err(JsValue::from)
    }

    /// Id of the single row in the natural tab order, if any.
    pub fn tab_stop(&self) -> Option<String> {
        self.tree.tab_stop().map(|id| id.to_string())
    }

    /// Forward a `KeyboardEvent.key`; returns the resulting tree event or
    /// `null` (also for keys outside the tree contract).
    pub fn handle_key(&mut self, key: &str) -> Result<JsValue, JsValue> {
        match TreeKey::from_dom_key(key) {
            Some(key) => {
                serde_wasm_bindgen::to_value(&self.tree.handle_key(key)).map_err(JsValue::from)
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Route the externally-owned current selection back into the tree.
    pub fn set_selection(&mut self, id: Option<String>) {
        self.tree.set_selection(id.map(RuleId::from).as_ref());
    }

    /// Activation click on a row.
    pub fn select(&mut self, id: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tree.select(&RuleId::from(id))).map_err(JsValue::from)
    }

    /// Disclosure-control click on a row.
    pub fn toggle(&mut self, id: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tree.toggle(&RuleId::from(id))).map_err(JsValue::from)
    }

    /// Full detail view for a rule, or `null` when the id is unknown.
    pub fn view(&self, id: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&viewer::view(
            &self.index,
            &RuleId::from(id),
            &self.home_label,
        ))
        .map_err(JsValue::from)
    }

    /// Ranked search hits for a query.
    pub fn search(&self, query: &str, limit: usize) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&search::search(&self.index, query, limit))
            .map_err(JsValue::from)
    }
}
