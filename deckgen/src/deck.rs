//! Slide deck types.
//!
//! A deck exists in two stages: [`GeneratedDeck`] as parsed from the model,
//! whose slides may carry an image hint, and [`SlideDeck`] after enrichment,
//! whose slides carry a resolved image reference instead.

use serde::{Deserialize, Serialize};

/// Deck as parsed from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDeck {
    /// Presentation title.
    pub title: String,
    /// Slides in presentation order.
    pub slides: Vec<GeneratedSlide>,
}

/// Slide as parsed from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawGeneratedSlide")]
pub struct GeneratedSlide {
    /// Slide title.
    pub title: String,
    /// Bullet points.
    pub content: Vec<String>,
    /// Search query or visual description for the slide's illustration.
    ///
    /// `Some` whenever the model sent a hint key, even a blank one.
    #[serde(rename = "image_search", skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
}

/// Wire shape of a generated slide.
///
/// The hint keys are separate fields so that a slide carrying several of
/// them still parses.
#[derive(Deserialize)]
struct RawGeneratedSlide {
    title: String,
    content: Vec<String>,
    #[serde(default)]
    image_search: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    image_hint: Option<String>,
}

impl From<RawGeneratedSlide> for GeneratedSlide {
    fn from(raw: RawGeneratedSlide) -> Self {
        let keys = [raw.image_search, raw.image, raw.image_hint];
        let image_hint = keys
            .iter()
            .flatten()
            .find(|h| !h.trim().is_empty())
            .or_else(|| keys.iter().flatten().next())
            .cloned();

        Self {
            title: raw.title,
            content: raw.content,
            image_hint,
        }
    }
}

impl GeneratedSlide {
    /// Whether the model asked for an illustration at all.
    #[must_use]
    pub const fn wants_image(&self) -> bool {
        self.image_hint.is_some()
    }

    /// The hint, if it is present and not blank.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.image_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Deck returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    /// Presentation title.
    pub title: String,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

/// Enriched slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide title.
    pub title: String,
    /// Bullet points.
    pub content: Vec<String>,
    /// Image reference.
    ///
    /// `None` omits the key (no hint was given), `Some(None)` serializes as
    /// `null` (the lookup found nothing or failed), `Some(Some(url))` is the
    /// resolved URL or `data:` URI.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub image_url: Option<Option<String>>,
}

impl Slide {
    /// A slide without an image key.
    #[must_use]
    pub fn without_image(slide: GeneratedSlide) -> Self {
        Self {
            title: slide.title,
            content: slide.content,
            image_url: None,
        }
    }

    /// A slide with a resolved (or explicitly empty) image reference.
    #[must_use]
    pub fn with_image(slide: GeneratedSlide, url: Option<String>) -> Self {
        Self {
            title: slide.title,
            content: slide.content,
            image_url: Some(url),
        }
    }
}

/// Keeps a present `null` distinct from a missing key.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
