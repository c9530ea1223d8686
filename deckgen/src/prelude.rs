//! Commonly used types.
//!
//! ```rust,ignore
//! use deckgen::prelude::*;
//! ```

pub use crate::agent::Agent;
pub use crate::config::{Credentials, DeckgenConfig, ImageSource, load_config};
pub use crate::deck::{GeneratedDeck, GeneratedSlide, Slide, SlideDeck};
pub use crate::enrich::Enricher;
pub use crate::error::{Error, Result};
pub use crate::extract::{extract_json_payload, parse_deck};
pub use crate::generation::{GenerationChunk, GenerationClient, GenerationStream, collect_text};
pub use crate::images::{ImageError, ImageLookup};
pub use crate::llms::{OpenAI, OpenAIConfig};
pub use crate::prompt::PromptBuilder;
pub use crate::rate_limit::RateLimiter;
pub use crate::request::{PresentationPayload, PresentationRequest};
pub use crate::server::{AppState, router, serve};
pub use crate::service::PresentationService;
pub use crate::tool::{Tool, ToolDefinition, ToolError};
