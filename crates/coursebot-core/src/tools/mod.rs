//! Tool management module
//!
//! Tools are capability units the model may invoke. The `ToolRegistry` owns
//! them, advertises their definitions and is the only place tool failures
//! are turned into text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  definitions()   ┌─────────────────────┐
//! │ ToolOrchestrator │ ───────────────▶ │ ToolRegistry        │
//! │                  │  dispatch(name)  │  - name → Tool      │
//! │                  │ ───────────────▶ │  - source slots     │
//! └──────────────────┘                  └──────────┬──────────┘
//!                                                  │ execute(args)
//!                                   ┌──────────────┴─────────────┐
//!                                   ▼                            ▼
//!                          CourseSearchTool             CourseOutlineTool
//!                                   └───────── SearchBackend ────┘
//! ```

mod traits;
mod registry;
mod search;
mod outline;

pub use traits::{parse_args, Tool, ToolError, ToolOutput};
pub use registry::{RegistryError, ToolOutcome, ToolRegistry};
pub use search::{CourseSearchTool, SEARCH_TOOL_NAME};
pub use outline::{CourseOutlineTool, OUTLINE_TOOL_NAME};
