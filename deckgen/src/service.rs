//! Presentation pipeline.
//!
//! [`PresentationService`] owns the provider handles and runs one request
//! end to end: prompt, generation, extraction, enrichment.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::agent::Agent;
use crate::config::{
    Credentials, DeckgenConfig, GOOGLE_API_KEY, ImageSource, TAVILY_API_KEY, UNSPLASH_API_KEY,
};
use crate::deck::SlideDeck;
use crate::enrich::Enricher;
use crate::error::{Error, Result};
use crate::extract::parse_deck;
use crate::generation::{GenerationClient, collect_text};
use crate::images::{GeminiImages, ImageError, ImageLookup, NoImages, TavilyImages, UnsplashImages};
use crate::llms::{OpenAI, OpenAIConfig};
use crate::prompt::PromptBuilder;
use crate::request::PresentationRequest;
use crate::tavily::TavilyClient;
use crate::tools::WebSearchTool;

/// Runs presentation requests against injected providers.
#[derive(Clone)]
pub struct PresentationService {
    generator: Arc<dyn GenerationClient>,
    enricher: Enricher,
    prompts: PromptBuilder,
    generation_timeout: Duration,
}

impl std::fmt::Debug for PresentationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationService")
            .field("enricher", &self.enricher)
            .field("prompts", &self.prompts)
            .field("generation_timeout", &self.generation_timeout)
            .finish_non_exhaustive()
    }
}

impl PresentationService {
    /// Assemble a service from explicit collaborators.
    #[must_use]
    pub const fn new(
        generator: Arc<dyn GenerationClient>,
        enricher: Enricher,
        prompts: PromptBuilder,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            enricher,
            prompts,
            generation_timeout,
        }
    }

    /// Build the production providers described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a needed credential is missing, or
    /// [`Error::Llm`] if the generation client cannot be created.
    pub fn from_config(config: &DeckgenConfig, credentials: &Credentials) -> Result<Self> {
        let generator = Arc::new(build_agent(config, credentials)?);
        let lookup = build_image_lookup(config, credentials)?;
        let enricher = Enricher::new(
            lookup,
            Duration::from_secs(config.images.timeout_secs),
            config.images.concurrency,
        );

        Ok(Self::new(
            generator,
            enricher,
            PromptBuilder::new(config.images.source),
            Duration::from_secs(config.generation.timeout_secs),
        ))
    }

    /// Produce an illustrated deck for a validated request.
    ///
    /// # Errors
    ///
    /// Fails if generation fails or times out, or if the model output is not
    /// a valid deck. Image failures never fail the request.
    pub async fn create(&self, request: &PresentationRequest) -> Result<SlideDeck> {
        let started = Instant::now();
        info!(
            audience = %request.audience(),
            topic = %request.description(),
            slides = request.number_of_slides(),
            bullets = ?request.number_of_bullet_points(),
            "Generating presentation"
        );

        let instruction = self.prompts.build(request);
        let stream = self.generator.stream(&instruction).await?;
        let raw = collect_text(stream, self.generation_timeout).await?;
        debug!(chars = raw.len(), raw = %raw, "Model output received");

        let generated = parse_deck(&raw)?;
        let hinted = generated.slides.iter().filter(|s| s.hint().is_some()).count();
        debug!(slides = generated.slides.len(), hinted, "Deck parsed");

        let deck = self.enricher.enrich(generated).await;
        let with_images = deck
            .slides
            .iter()
            .filter(|s| matches!(s.image_url, Some(Some(_))))
            .count();

        info!(
            title = %deck.title,
            slides = deck.slides.len(),
            with_images,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Presentation generated"
        );
        Ok(deck)
    }
}

fn build_agent(config: &DeckgenConfig, credentials: &Credentials) -> Result<Agent> {
    let generation = &config.generation;
    let llm = OpenAI::new(OpenAIConfig::from_generation(
        credentials.require(GOOGLE_API_KEY)?,
        generation,
    ))?;

    let mut agent = Agent::new(llm).max_steps(generation.max_steps);
    if generation.web_search {
        let tavily = tavily_client(
            credentials.require(TAVILY_API_KEY)?,
            &generation.search_base_url,
            Duration::from_secs(config.images.timeout_secs),
        )?;
        let tool = WebSearchTool::new(tavily).with_max_results(generation.search_max_results);
        agent = agent.tool(Arc::new(tool));
    }
    Ok(agent)
}

fn build_image_lookup(
    config: &DeckgenConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn ImageLookup>> {
    let images = &config.images;
    let timeout = Duration::from_secs(images.timeout_secs);

    let lookup: Arc<dyn ImageLookup> = match images.source {
        ImageSource::WebSearch => {
            let base_url = images
                .base_url
                .as_deref()
                .unwrap_or(&config.generation.search_base_url);
            let client = tavily_client(credentials.require(TAVILY_API_KEY)?, base_url, timeout)?;
            Arc::new(TavilyImages::new(client))
        }
        ImageSource::Unsplash => {
            let mut source = UnsplashImages::new(credentials.require(UNSPLASH_API_KEY)?, timeout)
                .map_err(image_setup_error)?;
            if let Some(url) = &images.base_url {
                source = source.with_base_url(url);
            }
            Arc::new(source)
        }
        ImageSource::Generate => {
            let mut source = GeminiImages::new(credentials.require(GOOGLE_API_KEY)?, timeout)
                .map_err(image_setup_error)?
                .with_model(&images.generate_model);
            if let Some(url) = &images.base_url {
                source = source.with_base_url(url);
            }
            Arc::new(source)
        }
        ImageSource::None => Arc::new(NoImages),
    };

    info!(source = %images.source, provider = lookup.provider_name(), "Image source ready");
    Ok(lookup)
}

fn tavily_client(api_key: &str, base_url: &str, timeout: Duration) -> Result<TavilyClient> {
    TavilyClient::new(api_key, timeout)
        .map(|c| c.with_base_url(base_url))
        .map_err(|e| Error::setup("tavily", e.to_string()))
}

fn image_setup_error(err: ImageError) -> Error {
    Error::setup("image source", err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::LimitsConfig;
    use crate::generation::{GenerationChunk, GenerationStream};
    use crate::request::PresentationPayload;

    #[derive(Debug)]
    struct CannedGenerator {
        chunks: Vec<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerationClient for CannedGenerator {
        async fn stream(&self, instruction: &str) -> Result<GenerationStream> {
            self.seen.lock().unwrap().push(instruction.to_owned());
            let items: Vec<Result<GenerationChunk>> = self
                .chunks
                .iter()
                .map(|c| Ok(GenerationChunk::text(*c)))
                .chain(std::iter::once(Ok(GenerationChunk::Done)))
                .collect();
            Ok(Box::pin(futures::stream::iter(items)))
        }
    }

    #[derive(Debug)]
    struct EchoLookup;

    #[async_trait]
    impl ImageLookup for EchoLookup {
        fn provider_name(&self) -> &'static str {
            "echo"
        }

        async fn lookup(&self, hint: &str, _count: usize) -> std::result::Result<Vec<String>, ImageError> {
            Ok(vec![format!("https://img/{}", hint.replace(' ', "-"))])
        }
    }

    fn request() -> PresentationRequest {
        PresentationRequest::validate(
            PresentationPayload {
                audience: Some("students".into()),
                description: Some("photosynthesis".into()),
                number_of_slides: Some(2),
                number_of_bullet_points: None,
            },
            &LimitsConfig::default(),
        )
        .unwrap()
    }

    fn service(chunks: Vec<&'static str>) -> (PresentationService, Arc<CannedGenerator>) {
        let generator = Arc::new(CannedGenerator {
            chunks,
            seen: Mutex::new(Vec::new()),
        });
        let enricher = Enricher::new(Arc::new(EchoLookup), Duration::from_secs(5), 4);
        let service = PresentationService::new(
            Arc::clone(&generator) as Arc<dyn GenerationClient>,
            enricher,
            PromptBuilder::new(ImageSource::Unsplash),
            Duration::from_secs(5),
        );
        (service, generator)
    }

    #[tokio::test]
    async fn creates_enriched_deck_from_streamed_chunks() {
        let (service, generator) = service(vec![
            "Sure!\n```json\n{\"title\": \"Photosynthesis\", \"slides\": [",
            "{\"title\": \"Light\", \"content\": [\"Sun\"], \"image_search\": \"sun rays\"},",
            "{\"title\": \"Summary\", \"content\": [\"Done\"]}]}\n```",
        ]);

        let deck = service.create(&request()).await.unwrap();

        assert_eq!(deck.title, "Photosynthesis");
        assert_eq!(deck.slides[0].image_url, Some(Some("https://img/sun-rays".into())));
        assert_eq!(deck.slides[1].image_url, None);

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Create 2 slides"));
    }

    #[tokio::test]
    async fn malformed_output_fails_the_request() {
        let (service, _) = service(vec!["I'm sorry, I can't help with that."]);
        let err = service.create(&request()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedOutput { .. }));
    }

    #[test]
    fn from_config_requires_credentials() {
        let config = DeckgenConfig::default();
        let err = PresentationService::from_config(&config, &Credentials::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn from_config_builds_every_source() {
        let creds = Credentials::new(Some("g".into()), Some("t".into()), Some("u".into()));
        for source in [
            ImageSource::WebSearch,
            ImageSource::Unsplash,
            ImageSource::Generate,
            ImageSource::None,
        ] {
            let mut config = DeckgenConfig::default();
            config.images.source = source;
            assert!(PresentationService::from_config(&config, &creds).is_ok(), "{source}");
        }
    }
}
