//! Built-in tools available to the generation agent.

mod web_search;

pub use web_search::{WebSearchArgs, WebSearchTool};
