//! Deckgen - presentation decks from hosted LLM agents
//!
//! This crate turns a presentation request (audience, topic, slide count)
//! into a structured slide deck. Content comes from a streaming LLM agent,
//! illustrations from an image search or image generation provider.
//!
//! The pipeline is:
//!
//! 1. [`request`] validates the caller's parameters.
//! 2. [`prompt`] renders the instruction for the model.
//! 3. [`generation`] streams the agent's answer ([`agent`] is the production client).
//! 4. [`extract`] recovers the JSON deck from free-form model text.
//! 5. [`enrich`] resolves per-slide image hints through [`images`].
//!
//! [`service::PresentationService`] wires these together and [`server`]
//! exposes it over HTTP.

pub mod agent;
pub mod config;
pub mod deck;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod generation;
pub mod images;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod prompt;
pub mod rate_limit;
pub mod request;
pub mod server;
pub mod service;
pub mod stream;
pub mod tavily;
pub mod tool;
pub mod tools;

pub use error::{Error, Result};
pub use llms::LlmError;
