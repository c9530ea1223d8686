//! LLM backend implementations.
//!
//! Only the OpenAI-compatible chat completions protocol is implemented. It is
//! spoken natively by OpenAI and by Gemini's compatibility endpoint, which is
//! the default generation backend.

mod error;
pub mod openai;

pub use error::LlmError;
pub use openai::{OpenAI, OpenAIConfig};
