//! Dataset codecs.
//!
//! The rules-loading collaborator: decodes rulebook source files into
//! [RuleNode] lists and assembles them into a [RuleIndex]. Codecs are
//! registered by file extension in the [`CODECS`] table; loading a
//! directory walks it and decodes every file with a registered extension,
//! in sorted path order, into one merged index.
//!
//! Decoding is tolerant in the same way index construction is: structural
//! problems in the dataset surface as [LoadDiagnostic]s, not errors.
//! Errors are reserved for unreadable files and malformed documents.

pub mod diagnostic;
mod md;
mod rules_json;
mod rules_toml;

use std::{collections::BTreeMap, fs::read_to_string, path::Path, sync::Arc};

use once_cell::sync::Lazy;
use walkdir::WalkDir;

pub use diagnostic::LoadDiagnostic;
pub use md::MarkdownCodec;
pub use rules_json::JsonCodec;
pub use rules_toml::TomlCodec;

use crate::{error::RuleboundError, index::RuleIndex, rule::RuleNode};

/// A decoder from one source-document format to rule nodes.
pub trait RuleCodec {
    /// Lowercase file extensions (without the dot) this codec claims.
    fn extensions(&self) -> &'static [&'static str];

    /// Decode a source document, preserving authored node order.
    fn decode(&self, source: &str) -> Result<Vec<RuleNode>, RuleboundError>;
}

/// Extension → codec registry.
pub struct CodecMap(BTreeMap<&'static str, Arc<dyn RuleCodec + Send + Sync>>);

/// The built-in codec registry.
pub static CODECS: Lazy<CodecMap> = Lazy::new(CodecMap::create);

impl CodecMap {
    fn create() -> Self {
        let mut map = CodecMap(BTreeMap::new());
        map.insert(Arc::new(JsonCodec));
        map.insert(Arc::new(TomlCodec));
        map.insert(Arc::new(MarkdownCodec));
        map
    }

    fn insert(&mut self, codec: Arc<dyn RuleCodec + Send + Sync>) {
        for extension in codec.extensions() {
            self.0.insert(extension, codec.clone());
        }
    }

    pub fn get(&self, extension: &str) -> Option<&Arc<dyn RuleCodec + Send + Sync>> {
        self.0.get(extension.to_lowercase().as_str())
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

/// Decode `source` with the codec registered for `extension`.
pub fn decode_str(source: &str, extension: &str) -> Result<Vec<RuleNode>, RuleboundError> {
    let codec = CODECS.get(extension).ok_or_else(|| {
        RuleboundError::Codec(format!("no codec registered for extension '{extension}'"))
    })?;
    codec.decode(source)
}

/// Decode a single dataset file.
pub fn load_file(path: &Path) -> Result<Vec<RuleNode>, RuleboundError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| RuleboundError::Codec(format!("'{}' has no extension", path.display())))?;
    tracing::debug!("decoding {}", path.display());
    decode_str(&read_to_string(path)?, extension)
}

/// Load a dataset file or directory into a [RuleIndex].
///
/// Directories are walked recursively; every file with a registered
/// extension is decoded, in sorted path order, and the node lists are
/// merged before index construction. An empty directory yields an empty
/// index, which is a valid terminal state.
pub fn load_path(path: &Path) -> Result<(RuleIndex, Vec<LoadDiagnostic>), RuleboundError> {
    let mut nodes = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let supported = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| CODECS.supports(e));
            if supported {
                nodes.extend(load_file(entry.path())?);
            }
        }
        if nodes.is_empty() {
            tracing::warn!("no rule documents found under {}", path.display());
        }
    } else {
        nodes = load_file(path)?;
    }
    Ok(RuleIndex::from_nodes(nodes))
}
