//! OpenAI-compatible chat completions client.
//!
//! Supports streaming chat completions with function calling. The same wire
//! protocol is served by Gemini's compatibility endpoint, which is what the
//! default configuration points at.

mod chat;
mod client;
mod config;
mod stream;
mod types;

pub use chat::ChatStream;
pub use client::OpenAI;
pub use config::OpenAIConfig;
pub use stream::SseDecoder;
