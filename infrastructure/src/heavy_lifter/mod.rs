//! HeavyLifter adapter: Gemini's `generateContent` REST API.

mod gateway;
mod protocol;
mod sse;

pub use gateway::{GeminiConfig, GeminiGateway};
