//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analyze_context;
pub mod process_task;
pub mod system_status;
