//! In-memory search backend

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::traits::{ChunkMetadata, CourseMetadata, SearchBackend, SearchQuery, SearchResults};

/// A passage of course content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChunk {
    pub content: String,
    pub course_title: String,
    pub lesson_number: Option<i64>,
    #[serde(default)]
    pub chunk_index: usize,
}

impl CourseChunk {
    pub fn new(course_title: impl Into<String>, lesson_number: Option<i64>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            course_title: course_title.into(),
            lesson_number,
            chunk_index: 0,
        }
    }
}

/// In-memory search backend for testing and demos
///
/// Ranks passages by how many query terms they contain. Passages sharing no
/// term with the query are not returned.
#[derive(Debug)]
pub struct MemorySearchStore {
    courses: RwLock<Vec<CourseMetadata>>,
    chunks: RwLock<Vec<CourseChunk>>,
    max_results: usize,
    unavailable: RwLock<Option<String>>,
}

impl Default for MemorySearchStore {
    fn default() -> Self {
        Self::new(5)
    }
}

impl MemorySearchStore {
    /// Create an empty store returning at most `max_results` passages
    pub fn new(max_results: usize) -> Self {
        Self {
            courses: RwLock::new(Vec::new()),
            chunks: RwLock::new(Vec::new()),
            max_results,
            unavailable: RwLock::new(None),
        }
    }

    /// Add a course record; an existing record with the same title is replaced
    pub fn add_course(&self, course: CourseMetadata) {
        let mut courses = self.courses.write();
        if let Some(existing) = courses.iter_mut().find(|c| c.title == course.title) {
            *existing = course;
        } else {
            courses.push(course);
        }
    }

    /// Add a passage; chunk indexes are assigned per course in insertion order
    pub fn add_chunk(&self, mut chunk: CourseChunk) {
        let mut chunks = self.chunks.write();
        chunk.chunk_index = chunks
            .iter()
            .filter(|c| c.course_title == chunk.course_title)
            .count();
        chunks.push(chunk);
    }

    /// Make every search fail with `Search error: <reason>`
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        *self.unavailable.write() = Some(reason.into());
    }

    /// Undo `set_unavailable`
    pub fn set_available(&self) {
        *self.unavailable.write() = None;
    }

    pub fn course_count(&self) -> usize {
        self.courses.read().len()
    }

    pub fn clear(&self) {
        self.courses.write().clear();
        self.chunks.write().clear();
    }

    fn resolve(&self, partial_title: &str) -> Option<String> {
        let needle = partial_title.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let courses = self.courses.read();

        if let Some(course) = courses.iter().find(|c| c.title.to_lowercase() == needle) {
            return Some(course.title.clone());
        }
        if let Some(course) = courses.iter().find(|c| {
            let title = c.title.to_lowercase();
            title.contains(&needle) || needle.contains(&title)
        }) {
            return Some(course.title.clone());
        }

        // Fall back to the title sharing the most words with the request
        let wanted = terms(&needle);
        courses
            .iter()
            .map(|c| (overlap(&wanted, &c.title.to_lowercase()), c))
            .filter(|(score, _)| *score > 0)
            .max_by_key(|(score, _)| *score)
            .map(|(_, c)| c.title.clone())
    }

    fn lesson_link(&self, course_title: &str, lesson_number: Option<i64>) -> Option<String> {
        let lesson_number = lesson_number?;
        self.courses
            .read()
            .iter()
            .find(|c| c.title == course_title)
            .and_then(|c| c.lesson_link(lesson_number))
            .map(str::to_string)
    }
}

fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn overlap(wanted: &[String], text: &str) -> usize {
    let have = terms(text);
    wanted.iter().filter(|t| have.contains(t)).count()
}

#[async_trait]
impl SearchBackend for MemorySearchStore {
    async fn search(&self, query: &SearchQuery) -> SearchResults {
        if let Some(reason) = self.unavailable.read().clone() {
            return SearchResults::from_error(format!("Search error: {}", reason));
        }

        let course_title = match &query.course_name {
            Some(name) => match self.resolve(name) {
                Some(title) => Some(title),
                None => {
                    return SearchResults::from_error(format!("No course found matching '{}'", name))
                }
            },
            None => None,
        };

        let wanted = terms(&query.query);
        let mut scored: Vec<(usize, CourseChunk)> = self
            .chunks
            .read()
            .iter()
            .filter(|c| course_title.as_ref().map_or(true, |t| &c.course_title == t))
            .filter(|c| query.lesson_number.map_or(true, |n| c.lesson_number == Some(n)))
            .map(|c| (overlap(&wanted, &c.content), c.clone()))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.max_results);

        let mut results = SearchResults::default();
        for (score, chunk) in scored {
            let lesson_link = self.lesson_link(&chunk.course_title, chunk.lesson_number);
            results.distances.push(1.0 - score as f32 / wanted.len().max(1) as f32);
            results.metadata.push(ChunkMetadata {
                course_title: Some(chunk.course_title),
                lesson_number: chunk.lesson_number,
                lesson_link,
                chunk_index: chunk.chunk_index,
            });
            results.documents.push(chunk.content);
        }
        results
    }

    async fn resolve_course_name(&self, partial_title: &str) -> Option<String> {
        self.resolve(partial_title)
    }

    async fn all_courses_metadata(&self) -> Vec<CourseMetadata> {
        self.courses.read().clone()
    }
}
