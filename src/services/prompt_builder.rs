use crate::models::Style;

const CRITICAL_RULES: &str = "CRITICAL RULES:
- DO NOT include any text, letters, numbers, words, or typography in the image
- NO Japanese characters, NO English text, NO numbers anywhere
- The image should be PURELY VISUAL - only graphics, photos, illustrations
- High visual impact that makes viewers want to click
- Clear focal point with strong composition
- Rich colors and high contrast for small thumbnail visibility
- Professional quality, not AI-looking
- The image should visually represent the topic without any text
- 16:9 aspect ratio (1280x720 equivalent composition)";

pub fn style_description(style: Style) -> &'static str {
    match style {
        Style::Business => {
            "Professional business style. Clean corporate look with bold typography implications. \
             Navy blue, white, and gold color scheme. Modern office or graph/chart imagery in background."
        }
        Style::Education => {
            "Educational/tutorial style. Bright, friendly, and approachable. \
             Use warm colors (orange, yellow, teal). Include subtle icons or visual elements suggesting learning."
        }
        Style::Entertainment => {
            "Entertainment/vlog style. High energy, vibrant colors (red, yellow, electric blue). \
             Dynamic composition with bold visual impact. Eye-catching and fun."
        }
        Style::Tech => {
            "Tech/programming style. Dark background with neon accents (cyan, purple, green). \
             Futuristic/digital aesthetic. Circuit patterns or code-like visual elements."
        }
        Style::Lifestyle => {
            "Lifestyle/wellness style. Soft, natural colors (sage green, blush pink, cream). \
             Warm lighting, cozy aesthetic. Minimalist and calming composition."
        }
        Style::News => {
            "News/commentary style. Bold red and white color scheme with high contrast. \
             Urgent, attention-grabbing design. Clean sans-serif typography feel."
        }
    }
}

/// Builds the provider prompt for a thumbnail.
///
/// Pure: the same inputs always give the same prompt. A style name outside
/// the known set uses the business description.
pub fn build_prompt(title: &str, style: &str, keywords: Option<&str>) -> String {
    let style: Style = style.parse().unwrap_or_default();
    let keywords_line = match keywords.map(str::trim) {
        Some(keywords) if !keywords.is_empty() => format!("KEYWORDS: {keywords}\n"),
        _ => String::new(),
    };

    format!(
        "Create a YouTube thumbnail image (16:9 landscape ratio).\n\n\
         TOPIC: \"{title}\"\n\
         {keywords_line}\n\
         STYLE: {description}\n\n\
         {rules}",
        description = style_description(style),
        rules = CRITICAL_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let first = build_prompt("Rust in 100 seconds", "tech", Some("ferris"));
        let second = build_prompt("Rust in 100 seconds", "tech", Some("ferris"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_contains_title_style_and_rules() {
        let prompt = build_prompt("Morning routine", "lifestyle", None);

        assert!(prompt.contains("TOPIC: \"Morning routine\""));
        assert!(prompt.contains(style_description(Style::Lifestyle)));
        assert!(prompt.contains("DO NOT include any text"));
        assert!(prompt.contains("16:9"));
        assert!(prompt.contains("not AI-looking"));
    }

    #[test]
    fn test_keywords_line_only_when_present() {
        let with = build_prompt("Morning routine", "lifestyle", Some("coffee, sunrise"));
        assert!(with.contains("KEYWORDS: coffee, sunrise\n"));

        for keywords in [None, Some(""), Some("   ")] {
            let without = build_prompt("Morning routine", "lifestyle", keywords);
            assert!(!without.contains("KEYWORDS:"));
        }
    }

    #[test]
    fn test_unknown_style_uses_business() {
        let unknown = build_prompt("Quarterly results", "synthwave", None);
        let business = build_prompt("Quarterly results", "business", None);

        assert_eq!(unknown, business);
        assert!(unknown.contains(style_description(Style::Business)));
    }

    #[test]
    fn test_every_style_has_distinct_description() {
        let mut descriptions: Vec<_> = Style::ALL.iter().map(|s| style_description(*s)).collect();
        descriptions.sort();
        descriptions.dedup();
        assert_eq!(descriptions.len(), Style::ALL.len());
    }
}
