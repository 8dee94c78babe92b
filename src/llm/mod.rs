//! LLM provider integrations and prompt construction

mod provider;
pub mod prompts;

pub use provider::*;
