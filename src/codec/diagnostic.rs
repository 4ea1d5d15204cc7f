//! Dataset load diagnostics.
//!
//! Index construction is diagnostic-driven, not fail-fast: an externally
//! produced dataset with dangling references or duplicate ids still loads,
//! and every tolerated inconsistency is reported here instead of thrown.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::rule::RuleId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDiagnostic {
    /// A second node claimed an already-registered id; the first wins.
    DuplicateId { id: RuleId },
    /// A node without an id cannot be addressed and is skipped.
    EmptyId { label: String },
    /// `parent_id` names a node absent from the dataset.
    DanglingParent { id: RuleId, parent: RuleId },
    /// A `children` entry names a node absent from the dataset.
    DanglingChild { parent: RuleId, child: RuleId },
    /// A `children` entry resolves, but the child's `parent_id` disagrees.
    /// The entry is ignored by hierarchy traversal.
    ParentMismatch { parent: RuleId, child: RuleId },
    /// A `cross_refs` entry names a node absent from the dataset.
    DanglingCrossRef { id: RuleId, target: RuleId },
    Warning(String),
}

impl LoadDiagnostic {
    /// Structural diagnostics affect hierarchy traversal; the rest only
    /// degrade auxiliary listings (cross-refs, backlinks).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LoadDiagnostic::DuplicateId { .. }
                | LoadDiagnostic::EmptyId { .. }
                | LoadDiagnostic::DanglingParent { .. }
                | LoadDiagnostic::DanglingChild { .. }
                | LoadDiagnostic::ParentMismatch { .. }
        )
    }
}

impl Display for LoadDiagnostic {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            LoadDiagnostic::DuplicateId { id } => {
                write!(f, "duplicate id '{id}' (first definition wins)")
            }
            LoadDiagnostic::EmptyId { label } => {
                write!(f, "node '{label}' has no id and was skipped")
            }
            LoadDiagnostic::DanglingParent { id, parent } => {
                write!(f, "'{id}' names missing parent '{parent}'")
            }
            LoadDiagnostic::DanglingChild { parent, child } => {
                write!(f, "'{parent}' lists missing child '{child}'")
            }
            LoadDiagnostic::ParentMismatch { parent, child } => {
                write!(
                    f,
                    "'{parent}' lists child '{child}' whose parent_id disagrees"
                )
            }
            LoadDiagnostic::DanglingCrossRef { id, target } => {
                write!(f, "'{id}' cross-references missing '{target}'")
            }
            LoadDiagnostic::Warning(msg) => write!(f, "{msg}"),
        }
    }
}
