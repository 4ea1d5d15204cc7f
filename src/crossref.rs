//! Inline cross-reference resolution.
//!
//! Rule text informally mentions other rules by number ("See rule
//! 103.1.a. for details"). [resolve_refs] splits a content string into an
//! ordered segment sequence where every resolvable mention becomes a
//! navigable link and everything else passes through verbatim. The
//! segments cover the original string exactly: concatenating their visible
//! text reproduces the input byte-for-byte.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{index::RuleIndex, rule::RuleId};

/// A rule-number mention: dot-separated components of digits or a single
/// lowercase letter, optionally preceded by the word "rule", closed by a
/// literal period. The number alone is captured; the period and any "rule"
/// prefix stay in the visible label.
static RULE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[Rr]ule\s+)?(\d+(?:\.(?:\d+|[a-z]))*)\.")
        .expect("rule reference pattern is valid")
});

/// One span of resolved rule content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text, emitted verbatim.
    Text { text: String },
    /// A navigable mention. `label` is the matched text exactly as it
    /// appeared; `target` is the id it resolves to.
    Link { label: String, target: RuleId },
}

impl Segment {
    /// The visible text of this segment (link labels included).
    pub fn visible_text(&self) -> &str {
        match self {
            Segment::Text { text } => text,
            Segment::Link { label, .. } => label,
        }
    }
}

/// Resolve rule-number mentions in `content` against `index`.
///
/// Mentions whose captured number is not an id in the index stay literal
/// text; no broken link is ever emitted. Adjacent literal spans are
/// merged, so the result never holds two consecutive `Text` segments.
pub fn resolve_refs(content: &str, index: &RuleIndex) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut cursor = 0;

    for caps in RULE_REF.captures_iter(content) {
        let whole = caps.get(0).expect("capture 0 always present");
        let number = &caps[1];
        buf.push_str(&content[cursor..whole.start()]);
        cursor = whole.end();
        if index.contains(number) {
            if !buf.is_empty() {
                segments.push(Segment::Text {
                    text: std::mem::take(&mut buf),
                });
            }
            segments.push(Segment::Link {
                label: whole.as_str().to_string(),
                target: RuleId::new(number),
            });
        } else {
            // Target missing from the index: fall back to plain text.
            buf.push_str(whole.as_str());
        }
    }

    buf.push_str(&content[cursor..]);
    if !buf.is_empty() {
        segments.push(Segment::Text { text: buf });
    }
    segments
}

/// Unique rule numbers mentioned in `content`, in first-occurrence order.
/// Used by the markdown codec to harvest cross-references while decoding.
pub fn scan_numbers(content: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in RULE_REF.captures_iter(content) {
        let number = caps[1].to_string();
        if !seen.contains(&number) {
            seen.push(number);
        }
    }
    seen
}

/// Concatenate the visible text of `segments`. By the round-trip law this
/// reproduces the original content string.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::visible_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleNode;

    fn index_with(ids: &[&str]) -> RuleIndex {
        let (index, _) = RuleIndex::from_nodes(ids.iter().map(|id| RuleNode {
            id: RuleId::new(*id),
            number: format!("{id}."),
            ..Default::default()
        }));
        index
    }

    #[test]
    fn resolves_prefixed_mention_into_three_segments() {
        let index = index_with(&["103.1.a"]);
        let segments = resolve_refs("See rule 103.1.a. for details", &index);
        assert_eq!(
            segments,
            vec![
                Segment::Text {
                    text: "See ".to_string()
                },
                Segment::Link {
                    label: "rule 103.1.a.".to_string(),
                    target: RuleId::new("103.1.a"),
                },
                Segment::Text {
                    text: " for details".to_string()
                },
            ]
        );
    }

    #[test]
    fn unresolved_mention_stays_literal() {
        let index = index_with(&["104"]);
        let content = "See rule 999. and rule 104.";
        let segments = resolve_refs(content, &index);
        assert_eq!(
            segments,
            vec![
                Segment::Text {
                    text: "See rule 999. and ".to_string()
                },
                Segment::Link {
                    label: "rule 104.".to_string(),
                    target: RuleId::new("104"),
                },
            ]
        );
        assert_eq!(plain_text(&segments), content);
    }

    #[test]
    fn round_trip_covers_input_exactly() {
        let index = index_with(&["100", "103.1.a", "601.2"]);
        for content in [
            "",
            "no mentions here",
            "100. leads, 601.2. follows, 103.1.a. closes.",
            "Rule 100. at sentence start and a dangling rule 777.",
            "adjacent 100.103.1.a. run",
        ] {
            let segments = resolve_refs(content, &index);
            assert_eq!(plain_text(&segments), content, "content: {content:?}");
            for pair in segments.windows(2) {
                assert!(
                    !matches!(
                        pair,
                        [Segment::Text { .. }, Segment::Text { .. }]
                    ),
                    "adjacent text segments must merge"
                );
            }
        }
    }

    #[test]
    fn number_without_trailing_period_is_not_a_mention() {
        let index = index_with(&["103"]);
        let segments = resolve_refs("rule 103 has no period", &index);
        assert_eq!(
            segments,
            vec![Segment::Text {
                text: "rule 103 has no period".to_string()
            }]
        );
    }

    #[test]
    fn scan_collects_unique_numbers_in_order() {
        assert_eq!(
            scan_numbers("See rule 103.1.a. then 100. then rule 103.1.a. again"),
            vec!["103.1.a".to_string(), "100".to_string()]
        );
    }
}
