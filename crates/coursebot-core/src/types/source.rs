//! Provenance metadata surfaced alongside an answer

use serde::{Deserialize, Serialize};

/// Human-facing provenance of a retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display text, e.g. `"Course Title - Lesson 2"`
    pub text: String,
    /// Optional link to the course or lesson
    #[serde(default)]
    pub link: Option<String>,
}

impl Source {
    /// A source without a link
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    /// A source with an optional link
    pub fn with_link(text: impl Into<String>, link: Option<String>) -> Self {
        Self {
            text: text.into(),
            link,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.link {
            Some(link) => write!(f, "{} ({})", self.text, link),
            None => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_null_link() {
        let json = serde_json::to_value(Source::new("Intro to MCP")).unwrap();
        assert_eq!(json["text"], "Intro to MCP");
        assert!(json["link"].is_null());
    }

    #[test]
    fn test_source_display() {
        let linked = Source::with_link("MCP - Lesson 1", Some("https://example.com/l1".into()));
        assert_eq!(linked.to_string(), "MCP - Lesson 1 (https://example.com/l1)");
        assert_eq!(Source::new("MCP").to_string(), "MCP");
    }
}
