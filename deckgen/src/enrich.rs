//! Per-slide image enrichment.
//!
//! Every slide with a hint gets exactly one lookup. A failed or empty lookup,
//! or a blank hint, yields `image_url: null` for that slide only; the deck is
//! always returned whole and in order.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, warn};

use crate::deck::{GeneratedDeck, GeneratedSlide, Slide, SlideDeck};
use crate::images::ImageLookup;

/// Resolves image hints into image references.
#[derive(Debug, Clone)]
pub struct Enricher {
    lookup: Arc<dyn ImageLookup>,
    timeout: Duration,
    concurrency: usize,
}

impl Enricher {
    /// Create an enricher with a per-lookup deadline and parallelism bound.
    #[must_use]
    pub fn new(lookup: Arc<dyn ImageLookup>, timeout: Duration, concurrency: usize) -> Self {
        Self {
            lookup,
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Replace every hint in `deck` with a resolved image reference.
    pub async fn enrich(&self, deck: GeneratedDeck) -> SlideDeck {
        let slides: Vec<Slide> = futures::stream::iter(deck.slides.into_iter().enumerate())
            .map(|(index, slide)| self.enrich_slide(index, slide))
            .buffered(self.concurrency)
            .collect()
            .await;

        SlideDeck {
            title: deck.title,
            slides,
        }
    }

    async fn enrich_slide(&self, index: usize, slide: GeneratedSlide) -> Slide {
        if !slide.wants_image() {
            return Slide::without_image(slide);
        }
        let Some(hint) = slide.hint().map(str::to_owned) else {
            debug!(slide = index, "Blank image hint");
            return Slide::with_image(slide, None);
        };

        let provider = self.lookup.provider_name();
        let url = match tokio::time::timeout(self.timeout, self.lookup.lookup(&hint, 1)).await {
            Ok(Ok(urls)) => {
                let first = urls.into_iter().next();
                debug!(slide = index, provider, hint = %hint, found = first.is_some(), "Image lookup finished");
                first
            }
            Ok(Err(err)) => {
                warn!(slide = index, provider, hint = %hint, error = %err, "Image lookup failed");
                None
            }
            Err(_) => {
                warn!(
                    slide = index,
                    provider,
                    hint = %hint,
                    timeout_secs = self.timeout.as_secs(),
                    "Image lookup timed out"
                );
                None
            }
        };

        Slide::with_image(slide, url)
    }
}
