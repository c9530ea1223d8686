//! Instruction template for deck generation.

use crate::config::ImageSource;
use crate::request::PresentationRequest;

const TEMPLATE: &str = r#"You are a presentation expert. Your task is to write the contents of a slide deck and a detailed outline for each slide.
For each slide, specify:
1. A clear title
2. Bullet points for the content
3. {hint_instruction}

IMPORTANT: Don't include actual image URLs in your response. Just provide {hint_plural} for images.

Remember the presentation is for {audience} and should be about {topic}. Make it interesting as well.

Format your response as valid JSON with the following structure:
{
  "title": "Presentation Title",
  "slides": [
    {
      "title": "<Slide Title>",
      "content": ["Point 1", "Point 2", "Point 3"],
      "image_search": "{hint_example}"
    }
  ]
}

Create {number_of_slides} slides{bullet_clause} with concise, impactful content.

IMPORTANT:
1. Do not include any text outside of the JSON response.
2. Do not include any explanations or additional information.
3. Do not include any code blocks.
4. Do not change the JSON structure.
5. In the slide content, do not include image URLs or {hint_plural}; put the {hint_noun} only in the image_search field, and do not start bullet points with a hyphen (-)."#;

/// Renders the generation instruction for a request.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    image_source: ImageSource,
}

impl PromptBuilder {
    /// Create a builder whose hint wording suits `image_source`.
    #[must_use]
    pub const fn new(image_source: ImageSource) -> Self {
        Self { image_source }
    }

    /// Render the instruction.
    #[must_use]
    pub fn build(&self, request: &PresentationRequest) -> String {
        let (hint_instruction, hint_noun, hint_plural, hint_example) = if self.image_source.is_generative() {
            (
                "A detailed visual description of an illustration for the slide (field \"image_search\")",
                "image description",
                "image descriptions",
                "A detailed description of the image so that it can be generated properly by an image model",
            )
        } else {
            (
                "An image search query for the slide when appropriate (field \"image_search\")",
                "image search query",
                "image search queries",
                "query for image",
            )
        };

        let bullet_clause = request
            .number_of_bullet_points()
            .map(|n| format!(" with exactly {n} bullet points each"))
            .unwrap_or_default();

        let number_of_slides = request.number_of_slides().to_string();
        render(
            TEMPLATE,
            &[
                ("hint_instruction", hint_instruction),
                ("hint_noun", hint_noun),
                ("hint_plural", hint_plural),
                ("hint_example", hint_example),
                ("bullet_clause", &bullet_clause),
                ("number_of_slides", &number_of_slides),
                ("audience", request.audience()),
                ("topic", request.description()),
            ],
        )
    }
}

/// Single-pass `{name}` substitution.
///
/// Substituted values are never rescanned, and braces that do not enclose a
/// known name are kept as they are.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let var = tail[1..].find('}').and_then(|end| {
            let name = &tail[1..=end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });
        match var {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::request::PresentationPayload;

    fn request(bullets: Option<i64>) -> PresentationRequest {
        PresentationRequest::validate(
            PresentationPayload {
                audience: Some("high school students".into()),
                description: Some("photosynthesis".into()),
                number_of_slides: Some(3),
                number_of_bullet_points: bullets,
            },
            &LimitsConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn fills_request_fields() {
        let prompt = PromptBuilder::new(ImageSource::Unsplash).build(&request(None));
        assert!(prompt.contains("for high school students"));
        assert!(prompt.contains("about photosynthesis"));
        assert!(prompt.contains("Create 3 slides with concise"));
        assert!(prompt.contains("\"image_search\": \"query for image\""));
        assert!(prompt.contains("{\n  \"title\": \"Presentation Title\""));
        assert!(!prompt.contains("{audience}"));
        assert!(!prompt.contains("{hint_noun}"));
        assert!(prompt.contains("Just provide image search queries for images."));
    }

    #[test]
    fn requests_exact_bullet_count() {
        let prompt = PromptBuilder::new(ImageSource::WebSearch).build(&request(Some(4)));
        assert!(prompt.contains("Create 3 slides with exactly 4 bullet points each"));
    }

    #[test]
    fn generative_source_asks_for_descriptions() {
        let prompt = PromptBuilder::new(ImageSource::Generate).build(&request(None));
        assert!(prompt.contains("detailed visual description"));
        assert!(prompt.contains("image descriptions for images"));
        assert!(!prompt.contains("image search query"));
    }

    #[test]
    fn user_text_is_not_reinterpreted() {
        let mut payload = PresentationPayload {
            audience: Some("devs".into()),
            description: Some("the {hint_noun} placeholder".into()),
            number_of_slides: Some(1),
            number_of_bullet_points: None,
        };
        payload.audience = Some("{topic} fans".into());
        let req = PresentationRequest::validate(payload, &LimitsConfig::default()).unwrap();
        let prompt = PromptBuilder::new(ImageSource::Unsplash).build(&req);
        assert!(prompt.contains("for {topic} fans"));
        assert!(prompt.contains("about the {hint_noun} placeholder"));
    }
}
