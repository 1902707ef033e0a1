//! Content search tool
//!
//! Delegates ranking to the search backend and renders passages with their
//! course and lesson context.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::search::{SearchBackend, SearchQuery, SearchResults};
use crate::types::{Source, ToolDefinition};

use super::traits::{parse_args, Tool, ToolError, ToolOutput};

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_lesson_number")]
    lesson_number: Option<i64>,
}

/// Accept `2` as well as `"2"`; models are not always strict about integers.
fn lenient_lesson_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("lesson_number must be an integer, got {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("lesson_number must be an integer, got '{}'", s))),
        Some(other) => Err(D::Error::custom(format!(
            "lesson_number must be an integer, got {}",
            other
        ))),
    }
}

/// Searches course content with course-name matching and lesson filtering
pub struct CourseSearchTool {
    store: Arc<dyn SearchBackend>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn SearchBackend>) -> Self {
        Self { store }
    }

    fn format_results(results: &SearchResults) -> ToolOutput {
        let mut formatted = Vec::with_capacity(results.documents.len());
        let mut sources = Vec::with_capacity(results.documents.len());

        for (doc, meta) in results.iter() {
            let course_title = meta.course_title.as_deref().unwrap_or("unknown");

            let (label, link) = match meta.lesson_number {
                Some(n) => (format!("{} - Lesson {}", course_title, n), meta.lesson_link.clone()),
                None => (course_title.to_string(), None),
            };

            formatted.push(format!("[{}]\n{}", label, doc));
            sources.push(Source::with_link(label, link));
        }

        ToolOutput::with_sources(formatted.join("\n\n"), sources)
    }

    fn empty_message(course_name: Option<&str>, lesson_number: Option<i64>) -> String {
        let mut message = String::from("No relevant content found");
        if let Some(course) = course_name {
            message.push_str(&format!(" in course '{}'", course));
        }
        if let Some(lesson) = lesson_number {
            message.push_str(&format!(" in lesson {}", lesson));
        }
        message.push('.');
        message
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SEARCH_TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
        )
        .with_schema(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for in the course content"
                },
                "course_name": {
                    "type": "string",
                    "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                },
                "lesson_number": {
                    "type": "integer",
                    "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                }
            },
            "required": ["query"]
        }))
    }

    async fn execute(&self, args: &Value) -> Result<ToolOutput, ToolError> {
        let args: SearchArgs = parse_args(args)?;
        // A blank course name means no course filter
        let course_name = args.course_name.filter(|name| !name.trim().is_empty());

        let query = SearchQuery {
            query: args.query,
            course_name: course_name.clone(),
            lesson_number: args.lesson_number,
        };
        let results = self.store.search(&query).await;

        // Backend errors are shown to the model verbatim
        if let Some(error) = results.error {
            return Ok(ToolOutput::text(error));
        }

        if results.is_empty() {
            return Ok(ToolOutput::text(Self::empty_message(
                course_name.as_deref(),
                args.lesson_number,
            )));
        }

        Ok(Self::format_results(&results))
    }
}
