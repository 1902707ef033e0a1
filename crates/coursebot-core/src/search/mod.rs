//! Search collaborator contract
//!
//! Ranking, embedding and fuzzy course-name resolution belong to the search
//! backend. The built-in tools only consume this contract:
//!
//! - `search` returns ranked passages, optionally filtered by course and lesson
//! - `resolve_course_name` maps a partial title to a canonical one
//! - `all_courses_metadata` lists course records with their lessons
//!
//! `MemorySearchStore` is an in-process backend used by tests and demos.

mod traits;
mod memory;

pub use traits::{
    ChunkMetadata, CourseMetadata, LessonMetadata, SearchBackend, SearchQuery, SearchResults,
};
pub use memory::{CourseChunk, MemorySearchStore};
