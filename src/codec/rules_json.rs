use serde::Deserialize;

use crate::{codec::RuleCodec, error::RuleboundError, rule::RuleNode};

/// JSON dataset codec.
///
/// Accepts either a bare array of nodes or a `{ "rules": [...] }` wrapper
/// (the export shape of the original web application; field aliases are
/// handled on [RuleNode] itself).
#[derive(Debug, Default, Clone)]
pub struct JsonCodec;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDataset {
    Wrapped { rules: Vec<RuleNode> },
    Bare(Vec<RuleNode>),
}

impl RuleCodec for JsonCodec {
    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, source: &str) -> Result<Vec<RuleNode>, RuleboundError> {
        let dataset: JsonDataset = serde_json::from_str(source)?;
        Ok(match dataset {
            JsonDataset::Wrapped { rules } => rules,
            JsonDataset::Bare(rules) => rules,
        })
    }
}
