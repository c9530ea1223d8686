//! Presentation request validation.
//!
//! [`PresentationPayload`] is the body as it arrives; every field is optional
//! so that missing values produce a precise message. [`PresentationRequest`]
//! can only be obtained through [`PresentationRequest::validate`].

use serde::{Deserialize, Serialize};

use crate::config::LimitsConfig;
use crate::error::{Error, Result};

/// Request body of `POST /presentation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationPayload {
    /// Who the presentation is for.
    #[serde(default)]
    pub audience: Option<String>,
    /// What the presentation is about.
    #[serde(default)]
    pub description: Option<String>,
    /// How many slides to generate.
    #[serde(default)]
    pub number_of_slides: Option<i64>,
    /// Bullet points per slide.
    #[serde(default)]
    pub number_of_bullet_points: Option<i64>,
}

/// A validated presentation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationRequest {
    audience: String,
    description: String,
    number_of_slides: u32,
    number_of_bullet_points: Option<u32>,
}

impl PresentationRequest {
    /// Validate a payload against the configured limits.
    ///
    /// Strings are trimmed; blank strings count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(payload: PresentationPayload, limits: &LimitsConfig) -> Result<Self> {
        let audience = required_text("audience", payload.audience)?;
        let description = required_text("description", payload.description)?;

        let number_of_slides = payload
            .number_of_slides
            .ok_or_else(|| Error::validation("number_of_slides is required"))
            .and_then(|n| bounded("number_of_slides", n, limits.max_slides))?;

        let number_of_bullet_points = payload
            .number_of_bullet_points
            .map(|n| bounded("number_of_bullet_points", n, limits.max_bullet_points))
            .transpose()?;

        Ok(Self {
            audience,
            description,
            number_of_slides,
            number_of_bullet_points,
        })
    }

    /// Who the presentation is for.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// What the presentation is about.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// How many slides to generate.
    #[must_use]
    pub const fn number_of_slides(&self) -> u32 {
        self.number_of_slides
    }

    /// Bullet points per slide, if the caller fixed it.
    #[must_use]
    pub const fn number_of_bullet_points(&self) -> Option<u32> {
        self.number_of_bullet_points
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(format!("{field} must not be empty")))
}

fn bounded(field: &str, value: i64, max: u32) -> Result<u32> {
    match u32::try_from(value) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(Error::validation(format!(
            "{field} must be between 1 and {max}, got {value}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(slides: i64, bullets: Option<i64>) -> PresentationPayload {
        PresentationPayload {
            audience: Some("students".into()),
            description: Some("photosynthesis".into()),
            number_of_slides: Some(slides),
            number_of_bullet_points: bullets,
        }
    }

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    #[test]
    fn accepts_valid_payload() {
        let req = PresentationRequest::validate(payload(3, Some(4)), &limits()).unwrap();
        assert_eq!(req.audience(), "students");
        assert_eq!(req.description(), "photosynthesis");
        assert_eq!(req.number_of_slides(), 3);
        assert_eq!(req.number_of_bullet_points(), Some(4));
    }

    #[test]
    fn bullet_count_is_optional() {
        let req = PresentationRequest::validate(payload(1, None), &limits()).unwrap();
        assert_eq!(req.number_of_bullet_points(), None);
    }

    #[test]
    fn rejects_out_of_range_counts() {
        for (slides, bullets) in [(0, None), (-2, None), (21, None), (3, Some(0)), (3, Some(6))] {
            let err = PresentationRequest::validate(payload(slides, bullets), &limits()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{slides}/{bullets:?}");
        }
    }

    #[test]
    fn rejects_huge_counts_without_overflow() {
        let err = PresentationRequest::validate(payload(i64::MAX, None), &limits()).unwrap_err();
        assert!(err.to_string().contains("number_of_slides"));
    }

    #[test]
    fn rejects_missing_or_blank_text() {
        let mut blank = payload(3, None);
        blank.audience = Some("   ".into());
        let err = PresentationRequest::validate(blank, &limits()).unwrap_err();
        assert!(err.to_string().contains("audience"));

        let mut missing = payload(3, None);
        missing.description = None;
        let err = PresentationRequest::validate(missing, &limits()).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn missing_slide_count_is_rejected() {
        let mut p = payload(3, None);
        p.number_of_slides = None;
        let err = PresentationRequest::validate(p, &limits()).unwrap_err();
        assert!(err.to_string().contains("number_of_slides is required"));
    }

    #[test]
    fn respects_configured_limits() {
        let limits = LimitsConfig {
            max_slides: 40,
            max_bullet_points: 8,
        };
        let req = PresentationRequest::validate(payload(40, Some(8)), &limits).unwrap();
        assert_eq!(req.number_of_slides(), 40);
    }
}
