//! Progress display for workflow stages

pub mod reporter;
