use crate::{
    errors::{GatewayError, Result},
    models::{GenerateBody, GenerationRequest, Style},
};

pub const MIN_TITLE_CHARS: usize = 3;
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_KEYWORDS_CHARS: usize = 100;

/// Parses and normalizes a raw generate body.
///
/// Lengths are counted in characters. The short-title check runs on the
/// trimmed title, the long-title check on the title as sent. An unknown or
/// non-string style is not an error; it becomes `business`.
pub fn validate(raw_body: &[u8]) -> Result<GenerationRequest> {
    let body: GenerateBody = serde_json::from_slice(raw_body)?;
    validate_body(body)
}

pub fn validate_body(body: GenerateBody) -> Result<GenerationRequest> {
    let raw_title = body.video_title.unwrap_or_default();
    let title = raw_title.trim();

    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(GatewayError::TitleTooShort);
    }
    if raw_title.chars().count() > MAX_TITLE_CHARS {
        return Err(GatewayError::TitleTooLong);
    }

    let keywords = match body.keywords {
        Some(keywords) if keywords.chars().count() > MAX_KEYWORDS_CHARS => {
            return Err(GatewayError::KeywordsTooLong);
        }
        Some(keywords) => Some(keywords.trim().to_string()).filter(|k| !k.is_empty()),
        None => None,
    };

    Ok(GenerationRequest {
        title: title.to_string(),
        style: Style::parse_or_default(body.style.as_ref().and_then(|style| style.as_str())),
        keywords,
    })
}
