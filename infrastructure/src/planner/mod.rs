//! Planner adapter: a vLLM server exposing the OpenAI chat completions API.

mod gateway;
mod protocol;

pub use gateway::{VllmPlannerConfig, VllmPlannerGateway};
