//! Markdown rulebook codec.
//!
//! Headings become rule sections: the heading depth drives the hierarchy
//! (via a heading stack, so a `##` section nests under the preceding `#`),
//! a leading rule-number prefix becomes `number`/`id`, and body text up to
//! the next heading becomes `content`. Cross-references are harvested from
//! explicit "rule N." mentions in the body once the whole document is
//! decoded, so only targets that actually exist in the document are kept.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;

use crate::{
    codec::RuleCodec,
    crossref::scan_numbers,
    error::RuleboundError,
    rule::{RuleId, RuleNode},
};

/// Leading rule-number prefix of a heading: the number, an optional
/// trailing period, then the title remainder.
static HEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.(?:\d+|[a-z]))*)(\.?)(?:\s+(.*))?$")
        .expect("heading number pattern is valid")
});

#[derive(Debug, Default, Clone)]
pub struct MarkdownCodec;

impl RuleCodec for MarkdownCodec {
    fn extensions(&self) -> &'static [&'static str] {
        &["md", "markdown"]
    }

    fn decode(&self, source: &str) -> Result<Vec<RuleNode>, RuleboundError> {
        let mut nodes: Vec<RuleNode> = Vec::new();
        // (heading depth, node position) of the open ancestors.
        let mut stack: Vec<(u8, usize)> = Vec::new();
        let mut heading: Option<(u8, String)> = None;

        for event in Parser::new(source) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((heading_depth(level), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((depth, text)) = heading.take() {
                        let mut node = section_from_heading(&text, depth);
                        while stack
                            .last()
                            .is_some_and(|(open_depth, _)| *open_depth >= depth)
                        {
                            stack.pop();
                        }
                        let position = nodes.len();
                        if let Some((_, parent_position)) = stack.last() {
                            let parent_id = nodes[*parent_position].id.clone();
                            node.parent_id = Some(parent_id);
                            nodes[*parent_position].children.push(node.id.clone());
                        }
                        nodes.push(node);
                        stack.push((depth, position));
                    }
                }
                Event::Text(text) => append(&mut heading, &mut nodes, &text),
                Event::Code(text) => append(&mut heading, &mut nodes, &text),
                Event::SoftBreak | Event::HardBreak => append(&mut heading, &mut nodes, " "),
                Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                    if let Some(current) = nodes.last_mut() {
                        if heading.is_none() {
                            current.content.push_str("\n\n");
                        }
                    }
                }
                _ => {}
            }
        }

        for node in &mut nodes {
            node.content = node.content.trim().to_string();
        }

        harvest_cross_refs(&mut nodes);
        Ok(nodes)
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn append(heading: &mut Option<(u8, String)>, nodes: &mut [RuleNode], text: &str) {
    if let Some((_, buf)) = heading.as_mut() {
        buf.push_str(text);
    } else if let Some(current) = nodes.last_mut() {
        current.content.push_str(text);
    }
    // Text before the first heading has no section to belong to.
}

fn section_from_heading(text: &str, depth: u8) -> RuleNode {
    let text = text.trim();
    let (id, number, title) = match HEADING_NUMBER.captures(text) {
        Some(caps) => {
            let bare = caps[1].to_string();
            let number = format!("{}{}", &caps[1], &caps[2]);
            let title = caps.get(3).map(|m| m.as_str().trim().to_string());
            (bare, number, title.unwrap_or_default())
        }
        None => (slug(text), String::new(), text.to_string()),
    };
    RuleNode {
        id: RuleId::new(id),
        number,
        title,
        level: depth.saturating_sub(1),
        ..Default::default()
    }
}

fn slug(text: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Fill `cross_refs` from explicit rule-number mentions in each node's
/// content, keeping only targets decoded from the same document set and
/// dropping self-references.
fn harvest_cross_refs(nodes: &mut Vec<RuleNode>) {
    let known: std::collections::HashSet<String> =
        nodes.iter().map(|node| node.id.as_str().to_string()).collect();
    for node in nodes.iter_mut() {
        node.cross_refs = scan_numbers(&node.content)
            .into_iter()
            .filter(|number| known.contains(number) && number != node.id.as_str())
            .map(RuleId::new)
            .collect();
    }
}
