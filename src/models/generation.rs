use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Visual style of the thumbnail. Unknown values degrade to `Business`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Business,
    Education,
    Entertainment,
    Tech,
    Lifestyle,
    News,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Business,
        Style::Education,
        Style::Entertainment,
        Style::Tech,
        Style::Lifestyle,
        Style::News,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Business => "business",
            Style::Education => "education",
            Style::Entertainment => "entertainment",
            Style::Tech => "tech",
            Style::Lifestyle => "lifestyle",
            Style::News => "news",
        }
    }

    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Style {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw JSON body accepted by the generate endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[schema(example = "10 Rust tips for beginners")]
    pub video_title: Option<String>,
    /// Any value other than a known style name, strings or not, means `business`.
    #[schema(value_type = Option<String>, example = "tech")]
    pub style: Option<serde_json::Value>,
    #[schema(example = "ownership, borrowing")]
    pub keywords: Option<String>,
}

/// Validated and normalized generation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub style: Style,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_url: String,
    pub revised_prompt: Option<String>,
    pub remaining_quota: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
    pub remaining: u32,
}

impl From<GenerationResult> for GenerateResponse {
    fn from(result: GenerationResult) -> Self {
        Self {
            image_url: result.image_url,
            revised_prompt: result.revised_prompt,
            remaining: result.remaining_quota,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parsing() {
        assert_eq!("tech".parse::<Style>(), Ok(Style::Tech));
        assert_eq!("news".parse::<Style>(), Ok(Style::News));
        assert!("Tech".parse::<Style>().is_err());
        assert!("cooking".parse::<Style>().is_err());
    }

    #[test]
    fn test_style_defaults_to_business() {
        assert_eq!(Style::parse_or_default(None), Style::Business);
        assert_eq!(Style::parse_or_default(Some("")), Style::Business);
        assert_eq!(Style::parse_or_default(Some("retro")), Style::Business);
        assert_eq!(Style::parse_or_default(Some("lifestyle")), Style::Lifestyle);
    }

    #[test]
    fn test_response_omits_missing_revised_prompt() {
        let body = serde_json::to_value(GenerateResponse {
            image_url: "https://img.example/1.png".into(),
            revised_prompt: None,
            remaining: 2,
        })
        .unwrap();

        assert_eq!(body["imageUrl"], "https://img.example/1.png");
        assert_eq!(body["remaining"], 2);
        assert!(body.get("revisedPrompt").is_none());
    }
}
