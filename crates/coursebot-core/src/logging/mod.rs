//! Logging abstractions
//!
//! Components receive an `Arc<dyn Logger>` at construction; nothing logs
//! through a global.

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{LogRecord, MemoryLogger};
