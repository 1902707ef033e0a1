//! Course outline tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::search::{CourseMetadata, SearchBackend};
use crate::types::{Source, ToolDefinition};

use super::traits::{parse_args, Tool, ToolError, ToolOutput};

pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_title: String,
}

/// Retrieves a course outline: title, link, instructor and lesson list
pub struct CourseOutlineTool {
    store: Arc<dyn SearchBackend>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn SearchBackend>) -> Self {
        Self { store }
    }

    fn format_outline(course: &CourseMetadata) -> String {
        let mut lines = vec![format!("**{}**", course.title)];

        if let Some(link) = &course.course_link {
            lines.push(format!("Course Link: {}", link));
        }
        if let Some(instructor) = &course.instructor {
            lines.push(format!("Instructor: {}", instructor));
        }

        if course.lessons.is_empty() {
            lines.push("\nNo lessons found for this course.".to_string());
        } else {
            lines.push("\n**Lessons:**".to_string());
            let mut lessons: Vec<_> = course.lessons.iter().collect();
            lessons.sort_by_key(|l| l.lesson_number);
            for lesson in lessons {
                lines.push(format!(
                    "Lesson {}: {}",
                    lesson.lesson_number,
                    lesson.lesson_title.as_deref().unwrap_or("Untitled")
                ));
            }
        }

        lines.join("\n")
    }
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            OUTLINE_TOOL_NAME,
            "Get course outline including course title, course link, and complete lesson list",
        )
        .with_schema(json!({
            "type": "object",
            "properties": {
                "course_title": {
                    "type": "string",
                    "description": "Course title to get outline for (partial matches work, e.g. 'MCP', 'Introduction')"
                }
            },
            "required": ["course_title"]
        }))
    }

    async fn execute(&self, args: &Value) -> Result<ToolOutput, ToolError> {
        let args: OutlineArgs = parse_args(args)?;

        let Some(resolved) = self.store.resolve_course_name(&args.course_title).await else {
            return Ok(ToolOutput::text(format!(
                "No course found matching '{}'",
                args.course_title
            )));
        };

        let course = self
            .store
            .all_courses_metadata()
            .await
            .into_iter()
            .find(|c| c.title == resolved);

        match course {
            Some(course) => {
                let source = Source::with_link(course.title.clone(), course.course_link.clone());
                Ok(ToolOutput::with_sources(Self::format_outline(&course), vec![source]))
            }
            None => Ok(ToolOutput::text(format!(
                "Course metadata not found for '{}'",
                resolved
            ))),
        }
    }
}
