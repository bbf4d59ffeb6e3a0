//! Model session domain.
//!
//! - [`stream::StreamEvent`] - one event in a streaming model response
//! - [`generation::Generation`] - a completed, non-streaming model response

pub mod generation;
pub mod stream;
