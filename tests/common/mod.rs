//! Shared fixtures for integration tests.

use std::{fs, path::Path};

use tempfile::TempDir;

pub const CORE_RULEBOOK_MD: &str = "\
# 100. Starting the Game

Setup proceeds in order. See rule 100.1. first.

## 100.1. Opening Hands

Each player draws a starting hand.

## 100.2. Mulligans

A player may mulligan; see rule 100.1. for hand size.
";

pub const ADVANCED_RULES_TOML: &str = r#"
[[rules]]
id = "600"
number = "600."
title = "Advanced Play"
children = ["600.1"]

[[rules]]
id = "600.1"
number = "600.1."
title = "Priority"
parent_id = "600"
level = 1
content = "Priority follows rule 100. during setup."
cross_refs = ["100"]
"#;

pub const GLOSSARY_JSON: &str = r#"{
  "rules": [
    {
      "id": "glossary",
      "title": "Glossary",
      "content": "Terms used by the rules.",
      "crossRefs": ["600"]
    }
  ]
}"#;

/// Lay out a dataset directory holding all three formats plus one file no
/// codec claims.
pub fn dataset_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "10_core.md", CORE_RULEBOOK_MD);
    write(dir.path(), "20_advanced.toml", ADVANCED_RULES_TOML);
    write(dir.path(), "30_glossary.json", GLOSSARY_JSON);
    write(dir.path(), "notes.txt", "not a rules document");
    dir
}

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}
