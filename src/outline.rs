//! Outline data model and the line-pattern scanner that produces it.
//!
//! An outline is an ordered mapping of section title to an ordered list of
//! topic strings. Section titles are unique per outline (a duplicate title
//! resets the earlier section's topics in place); topics may repeat freely.
//!
//! The text format consumed by [`parse_outline`]:
//!
//! - `<digits>. <title>` starts a new section,
//! - `- <topic>` (after trimming) appends a topic to the current section,
//! - every other line is ignored, and a topic line before any section
//!   header is silently dropped.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// One titled section with its ordered topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The section title, trimmed
    pub title: String,
    /// Ordered topic strings, each non-empty and trimmed
    pub topics: Vec<String>,
}

impl Section {
    /// Create a section with the given title and topics
    pub fn new(title: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            title: title.into(),
            topics,
        }
    }
}

/// Parsed two-level outline: ordered sections, each with ordered topics.
///
/// An outline with zero sections is valid; every metric treats it as a
/// degenerate input with a zero or neutral value, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    sections: Vec<Section>,
}

impl Outline {
    /// Create an empty outline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an outline from sections, applying the duplicate-title rule:
    /// a repeated title keeps its first position but takes the later
    /// section's topics.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut outline = Self::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for section in sections {
            let at = outline.begin_section(&mut index, &section.title);
            outline.sections[at].topics = section.topics;
        }
        outline
    }

    /// The ordered sections
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Whether the outline has no sections at all
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Topic count per section, in section order
    pub fn topic_counts(&self) -> Vec<usize> {
        self.sections.iter().map(|s| s.topics.len()).collect()
    }

    /// Total number of topics across all sections
    pub fn total_topic_count(&self) -> usize {
        self.sections.iter().map(|s| s.topics.len()).sum()
    }

    /// All topics flattened in section order then in-section order,
    /// duplicates preserved.
    pub fn flatten(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.topics.iter().map(String::as_str))
            .collect()
    }

    /// Distinct topics in first-occurrence order.
    pub fn distinct_topics(&self) -> Vec<&str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut topics = Vec::new();
        for topic in self.flatten() {
            if seen.insert(topic) {
                topics.push(topic);
            }
        }
        topics
    }

    /// Start (or restart) the section with `title`, returning its index.
    fn begin_section(&mut self, index: &mut FxHashMap<String, usize>, title: &str) -> usize {
        if let Some(&at) = index.get(title) {
            self.sections[at].topics.clear();
            return at;
        }
        let at = self.sections.len();
        index.insert(title.to_string(), at);
        self.sections.push(Section::new(title, Vec::new()));
        at
    }
}

/// Parse outline text into an [`Outline`]. Total: never fails, unmatched
/// lines are skipped.
pub fn parse_outline(text: &str) -> Outline {
    let mut outline = Outline::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(title) = parse_section_header(line) {
            current = Some(outline.begin_section(&mut index, title));
        } else if let Some(rest) = line.strip_prefix("- ") {
            let topic = rest.trim();
            if topic.is_empty() {
                continue;
            }
            if let Some(at) = current {
                outline.sections[at].topics.push(topic.to_string());
            }
        }
    }

    outline
}

/// Match `^<digits>. <title>` against an already-trimmed line, returning
/// the trimmed title.
fn parse_section_header(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let mut chars = rest.chars();
    if !chars.next()?.is_whitespace() {
        return None;
    }
    let title = chars.as_str().trim();
    if title.is_empty() {
        return None;
    }
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let outline = parse_outline("1. Intro\n- Variables\n- Types\n2. Control Flow\n- Loops\n");
        assert_eq!(outline.section_count(), 2);
        assert_eq!(outline.sections()[0].title, "Intro");
        assert_eq!(outline.sections()[0].topics, vec!["Variables", "Types"]);
        assert_eq!(outline.sections()[1].topics, vec!["Loops"]);
    }

    #[test]
    fn test_parse_ignores_unmatched_lines() {
        let outline = parse_outline("preamble\n1. Intro\nsome note\n- Variables\n# comment\n");
        assert_eq!(outline.section_count(), 1);
        assert_eq!(outline.sections()[0].topics, vec!["Variables"]);
    }

    #[test]
    fn test_parse_topic_before_header_dropped() {
        let outline = parse_outline("- Orphan\n1. Intro\n- Variables\n");
        assert_eq!(outline.flatten(), vec!["Variables"]);
    }

    #[test]
    fn test_parse_trims_title_and_topics() {
        let outline = parse_outline("  12.   Deep   Topics  \n  -   spaced out  \n");
        assert_eq!(outline.sections()[0].title, "Deep   Topics");
        assert_eq!(outline.sections()[0].topics, vec!["spaced out"]);
    }

    #[test]
    fn test_parse_duplicate_title_overwrites_in_place() {
        let outline = parse_outline("1. A\n- one\n2. B\n- two\n3. A\n- three\n");
        assert_eq!(outline.section_count(), 2);
        // "A" keeps its original position but holds the later topics.
        assert_eq!(outline.sections()[0].title, "A");
        assert_eq!(outline.sections()[0].topics, vec!["three"]);
        assert_eq!(outline.sections()[1].title, "B");
    }

    #[test]
    fn test_parse_empty_text() {
        let outline = parse_outline("");
        assert!(outline.is_empty());
        assert_eq!(outline.total_topic_count(), 0);
    }

    #[test]
    fn test_parse_header_requires_digits_and_dot() {
        assert!(parse_outline("x. Intro\n- a\n").is_empty());
        assert!(parse_outline("1 Intro\n- a\n").is_empty());
        assert!(parse_outline("1.Intro\n- a\n").is_empty());
        assert!(!parse_outline("1.\tIntro\n- a\n").is_empty());
    }

    #[test]
    fn test_flatten_preserves_duplicates_and_order() {
        let outline = parse_outline("1. A\n- x\n- y\n2. B\n- x\n");
        assert_eq!(outline.flatten(), vec!["x", "y", "x"]);
        assert_eq!(outline.distinct_topics(), vec!["x", "y"]);
    }

    #[test]
    fn test_from_sections_duplicate_rule() {
        let outline = Outline::from_sections(vec![
            Section::new("A", vec!["one".into()]),
            Section::new("B", vec!["two".into()]),
            Section::new("A", vec!["three".into()]),
        ]);
        assert_eq!(outline.section_count(), 2);
        assert_eq!(outline.sections()[0].topics, vec!["three"]);
    }

    #[test]
    fn test_topic_counts() {
        let outline = parse_outline("1. A\n- x\n- y\n2. B\n");
        assert_eq!(outline.topic_counts(), vec![2, 0]);
    }
}
