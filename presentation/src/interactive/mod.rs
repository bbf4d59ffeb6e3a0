//! Interactive mode
//!
//! Provides a line-editor based prompt that runs each entered task through
//! the workflow.

mod repl;

pub use repl::{InteractiveRepl, ReplInput};
