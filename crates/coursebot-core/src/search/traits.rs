//! Search backend trait and result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A search request against course content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// What to search for
    pub query: String,
    /// Optional course filter (partial titles are resolved by the backend)
    pub course_name: Option<String>,
    /// Optional lesson filter
    pub lesson_number: Option<i64>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_course(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = Some(course_name.into());
        self
    }

    pub fn with_lesson(mut self, lesson_number: i64) -> Self {
        self.lesson_number = Some(lesson_number);
        self
    }
}

/// Metadata attached to one returned passage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: Option<String>,
    pub lesson_number: Option<i64>,
    pub lesson_link: Option<String>,
    #[serde(default)]
    pub chunk_index: usize,
}

/// Ranked passages plus their metadata, or an error message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    #[serde(default)]
    pub distances: Vec<f32>,
    /// Set when the backend could not serve the request
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchResults {
    /// Results carrying only an error message
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents paired with their metadata, in rank order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ChunkMetadata)> {
        self.documents.iter().zip(self.metadata.iter())
    }
}

/// One lesson in a course record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonMetadata {
    pub lesson_number: i64,
    pub lesson_title: Option<String>,
    pub lesson_link: Option<String>,
}

impl LessonMetadata {
    pub fn new(lesson_number: i64, lesson_title: impl Into<String>) -> Self {
        Self {
            lesson_number,
            lesson_title: Some(lesson_title.into()),
            lesson_link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.lesson_link = Some(link.into());
        self
    }
}

/// Course-level record from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub title: String,
    pub course_link: Option<String>,
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonMetadata>,
}

impl CourseMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            course_link: None,
            instructor: None,
            lessons: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.course_link = Some(link.into());
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_lesson(mut self, lesson: LessonMetadata) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Link of the given lesson, if the course lists one
    pub fn lesson_link(&self, lesson_number: i64) -> Option<&str> {
        self.lessons
            .iter()
            .find(|l| l.lesson_number == lesson_number)
            .and_then(|l| l.lesson_link.as_deref())
    }
}

/// Backend that owns ranking and course-name resolution
///
/// Implementations:
/// - `MemorySearchStore`: In-memory keyword backend for tests
/// - Vector-store adapters living outside this crate
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a filtered search. Failures are reported through `SearchResults::error`.
    async fn search(&self, query: &SearchQuery) -> SearchResults;

    /// Map a partial or approximate title to a stored title
    async fn resolve_course_name(&self, partial_title: &str) -> Option<String>;

    /// Every course record in the catalog
    async fn all_courses_metadata(&self) -> Vec<CourseMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_results_are_empty() {
        let results = SearchResults::from_error("Search error: connection refused");
        assert!(results.is_empty());
        assert_eq!(results.error.as_deref(), Some("Search error: connection refused"));
    }

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("tools").with_course("MCP").with_lesson(3);
        assert_eq!(query.course_name.as_deref(), Some("MCP"));
        assert_eq!(query.lesson_number, Some(3));
    }

    #[test]
    fn test_course_lesson_link_lookup() {
        let course = CourseMetadata::new("Intro")
            .with_lesson(LessonMetadata::new(1, "Start").with_link("https://example.com/1"))
            .with_lesson(LessonMetadata::new(2, "Next"));

        assert_eq!(course.lesson_link(1), Some("https://example.com/1"));
        assert_eq!(course.lesson_link(2), None);
        assert_eq!(course.lesson_link(9), None);
    }
}
