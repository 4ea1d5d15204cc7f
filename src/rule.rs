//! Core data entities: [RuleId], [RuleNode], and the level-derived
//! [SectionRank] style table.

use std::{
    borrow::Borrow,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a rule section (e.g. `"103.1.a"`).
///
/// Ids are author-assigned strings, used as the map key in
/// [crate::index::RuleIndex] and as the unit of navigation. They are
/// compared byte-wise; no structure is inferred from them.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        RuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId(id.to_string())
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        RuleId(id)
    }
}

impl AsRef<str> for RuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lets `HashMap<RuleId, _>` be probed with `&str` keys.
impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record in the hierarchical rules dataset. Immutable once loaded.
///
/// `children` is the authoritative child relationship; `parent_id`
/// back-references are validated against it at load time but never used to
/// synthesize children. `level` is an author-assigned display hint and is
/// not guaranteed to match actual graph depth.
///
/// The serde aliases (`parentId`, `crossRefs`) accept datasets exported
/// from the original web application unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleNode {
    pub id: RuleId,
    /// Human-facing numbering string (may differ cosmetically from `id`,
    /// e.g. a trailing period).
    pub number: String,
    pub title: String,
    /// Free text; may embed informal references to other rule numbers,
    /// resolved by [crate::crossref::resolve_refs].
    pub content: String,
    /// Depth marker, 0 = top-level section. Display hint only.
    pub level: u8,
    #[serde(alias = "parentId")]
    pub parent_id: Option<RuleId>,
    /// Direct children, in authored order.
    #[serde(alias = "childIds")]
    pub children: Vec<RuleId>,
    /// Related-but-not-hierarchical rules.
    #[serde(alias = "crossRefs")]
    pub cross_refs: Vec<RuleId>,
}

impl RuleNode {
    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Render label: `number` and `title` joined, whichever are present.
    pub fn label(&self) -> String {
        match (self.number.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} {}", self.number, self.title),
            (false, true) => self.number.clone(),
            (true, _) => self.title.clone(),
        }
    }

    /// Ordering key for tree sibling sort. Falls back to the id when the
    /// dataset carries no `number`, so untitled sections still order
    /// deterministically.
    pub fn sort_key(&self) -> &str {
        if self.number.is_empty() {
            self.id.as_str()
        } else {
            &self.number
        }
    }

    pub fn rank(&self) -> SectionRank {
        SectionRank::from_level(self.level)
    }
}

impl Display for RuleNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.id)
    }
}

/// Section rank derived from [RuleNode::level].
///
/// Style switching over `level` lives in this one lookup table; renderers
/// branch on the returned [StyleDescriptor] instead of on raw levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionRank {
    Part,
    Chapter,
    Section,
    Clause,
}

/// Render hints for one [SectionRank]. `class` targets the web shell's
/// stylesheet, `heading_rank` the h2..h5 element choice, `marker` the CLI
/// tree glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleDescriptor {
    pub class: &'static str,
    pub heading_rank: u8,
    pub marker: &'static str,
}

const STYLE_TABLE: [StyleDescriptor; 4] = [
    StyleDescriptor {
        class: "rule-part",
        heading_rank: 2,
        marker: "#",
    },
    StyleDescriptor {
        class: "rule-chapter",
        heading_rank: 3,
        marker: "*",
    },
    StyleDescriptor {
        class: "rule-section",
        heading_rank: 4,
        marker: "-",
    },
    StyleDescriptor {
        class: "rule-clause",
        heading_rank: 5,
        marker: "·",
    },
];

impl SectionRank {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => SectionRank::Part,
            1 => SectionRank::Chapter,
            2 => SectionRank::Section,
            _ => SectionRank::Clause,
        }
    }

    pub const fn descriptor(self) -> &'static StyleDescriptor {
        &STYLE_TABLE[self as usize]
    }
}
