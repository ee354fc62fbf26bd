//! Parsing and repair of the two-field annotation template.
//!
//! The model is asked to reply in the literal form
//! `- Description: ...` / `- Tags: [...]`, but the output format is not
//! contractually guaranteed. Parsing therefore degrades in stages: a strict
//! prefix match first, then a case-insensitive substring scan, and finally
//! the raw text is kept as [`Annotation::Unparsed`].

/// Canonical description line prefix.
pub const DESCRIPTION_MARKER: &str = "- Description:";
/// Canonical tags line prefix.
pub const TAGS_MARKER: &str = "- Tags:";

/// Typed view of a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// At least one of the two fields was recovered from the text.
    Parsed { description: String, tags: String },
    /// Neither field could be located; the raw text is preserved.
    Unparsed(String),
}

impl Annotation {
    /// Parse a reply into description and tags.
    ///
    /// The strict pass requires the canonical `- Description:` / `- Tags:`
    /// line prefixes. If neither matches, a second pass scans every line
    /// case-insensitively for a `description:` or `tags:` substring.
    pub fn parse(text: &str) -> Self {
        let mut description = String::new();
        let mut tags = String::new();

        for line in text.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix(DESCRIPTION_MARKER) {
                description = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix(TAGS_MARKER) {
                tags = rest.trim().to_string();
            }
        }

        if description.is_empty() && tags.is_empty() {
            for line in text.lines() {
                let line = line.trim();
                if let Some(value) = find_marker_value(line, "description:") {
                    description = value.to_string();
                } else if let Some(value) = find_marker_value(line, "tags:") {
                    tags = value.to_string();
                }
            }
        }

        if description.is_empty() && tags.is_empty() {
            Self::Unparsed(text.to_string())
        } else {
            Self::Parsed { description, tags }
        }
    }

    /// Description column value; empty for unparsed text.
    pub fn description(&self) -> &str {
        match self {
            Self::Parsed { description, .. } => description,
            Self::Unparsed(_) => "",
        }
    }

    /// Tags column value; empty for unparsed text.
    pub fn tags(&self) -> &str {
        match self {
            Self::Parsed { tags, .. } => tags,
            Self::Unparsed(_) => "",
        }
    }
}

/// Case-insensitively locate `marker` in `line` and return the trimmed
/// remainder of the original line after it.
fn find_marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let idx = line.to_lowercase().find(marker)?;
    // Slice the original line; fall back to empty on a non-ASCII boundary
    // mismatch between the lowered copy and the original.
    Some(line.get(idx + marker.len()..).unwrap_or("").trim())
}

/// Best-effort repair of a reply that drifted from the canonical template.
///
/// A reply already containing both `Description:` and `Tags:` is returned
/// unchanged. Otherwise each line is scanned case-insensitively and matched
/// lines are re-emitted under the canonical prefixes. Text without any
/// recognizable marker is accepted as-is rather than treated as an error.
pub fn canonicalize(text: &str) -> String {
    let text = text.trim();
    if text.contains("Description:") && text.contains("Tags:") {
        return text.to_string();
    }

    let mut repaired = String::new();
    for line in text.lines() {
        let line = line.trim();
        if let Some(value) = find_marker_value(line, "description:") {
            repaired.push_str(DESCRIPTION_MARKER);
            repaired.push(' ');
            repaired.push_str(value);
            repaired.push('\n');
        } else if let Some(value) = find_marker_value(line, "tags:") {
            repaired.push_str(TAGS_MARKER);
            repaired.push(' ');
            repaired.push_str(value);
        }
    }

    if repaired.is_empty() {
        text.to_string()
    } else {
        repaired.trim_end().to_string()
    }
}

/// Rebuild the canonical two-line template from previously persisted
/// description and tags columns.
pub fn reconstitute(description: &str, tags: &str) -> String {
    format!("{DESCRIPTION_MARKER} {description}\n{TAGS_MARKER} {tags}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let text = "- Description: A calm lake.\n- Tags: [calm, lake, nature]";
        let annotation = Annotation::parse(text);
        assert_eq!(annotation.description(), "A calm lake.");
        assert_eq!(annotation.tags(), "[calm, lake, nature]");
    }

    #[test]
    fn test_parse_case_insensitive_fallback() {
        let text = "DESCRIPTION: a dog running\nhere are the TAGS: [dog, park]";
        let annotation = Annotation::parse(text);
        assert_eq!(annotation.description(), "a dog running");
        assert_eq!(annotation.tags(), "[dog, park]");
    }

    #[test]
    fn test_parse_unparsed() {
        let text = "The video shows a sunset over the ocean.";
        match Annotation::parse(text) {
            Annotation::Unparsed(raw) => assert_eq!(raw, text),
            other => panic!("expected Unparsed, got {other:?}"),
        }
        assert_eq!(Annotation::parse(text).description(), "");
        assert_eq!(Annotation::parse(text).tags(), "");
    }

    #[test]
    fn test_parse_partial_fields() {
        let text = "- Description: Only a description here.";
        let annotation = Annotation::parse(text);
        assert_eq!(annotation.description(), "Only a description here.");
        assert_eq!(annotation.tags(), "");
    }

    #[test]
    fn test_canonicalize_repairs_markers() {
        let text = "description: A man speaking outdoors\ntags: [man, outdoor]";
        let repaired = canonicalize(text);
        assert!(repaired.contains(DESCRIPTION_MARKER));
        assert!(repaired.contains(TAGS_MARKER));
        assert!(repaired.contains("A man speaking outdoors"));
        assert!(repaired.contains("[man, outdoor]"));
    }

    #[test]
    fn test_canonicalize_keeps_conforming_text() {
        let text = "- Description: A calm lake.\n- Tags: [calm, lake]";
        assert_eq!(canonicalize(text), text);
    }

    #[test]
    fn test_canonicalize_accepts_markerless_text() {
        let text = "A freeform answer with no structure at all.";
        assert_eq!(canonicalize(text), text);
    }

    #[test]
    fn test_reconstitute_roundtrips_through_parse() {
        let text = reconstitute("A calm lake.", "[calm, lake, nature]");
        let annotation = Annotation::parse(&text);
        assert_eq!(annotation.description(), "A calm lake.");
        assert_eq!(annotation.tags(), "[calm, lake, nature]");
    }
}
