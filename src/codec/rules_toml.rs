use serde::Deserialize;

use crate::{codec::RuleCodec, error::RuleboundError, rule::RuleNode};

/// TOML dataset codec: a `[[rules]]` array of tables.
#[derive(Debug, Default, Clone)]
pub struct TomlCodec;

#[derive(Debug, Default, Deserialize)]
struct TomlDataset {
    #[serde(default)]
    rules: Vec<RuleNode>,
}

impl RuleCodec for TomlCodec {
    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn decode(&self, source: &str) -> Result<Vec<RuleNode>, RuleboundError> {
        let dataset: TomlDataset = toml::from_str(source)?;
        Ok(dataset.rules)
    }
}
