//! Prompt domain
//!
//! Templates for generating the prompts each workflow stage sends to the models.

mod template;

pub use template::PromptTemplate;
