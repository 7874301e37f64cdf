//! Text processing utilities for message content.

use once_cell::sync::Lazy;
use regex::Regex;

use super::MessageBody;

/// Regex pattern to match an embedded image: [image]<url>[/image]
static IMAGE_MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[image\](.*?)\[/image\]").expect("Invalid image markup regex")
});

/// Stand-in text for a message that carries only an image.
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Split backend content into text or an image with an optional caption.
///
/// Only the first image reference is honoured; the text around it,
/// trimmed, becomes the caption.
pub fn parse_image_markup(content: &str) -> MessageBody {
    let Some(captures) = IMAGE_MARKUP_REGEX.captures(content) else {
        return MessageBody::Text(content.to_string());
    };

    let url = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    if url.is_empty() {
        return MessageBody::Text(content.to_string());
    }

    let caption = IMAGE_MARKUP_REGEX.replace(content, "").trim().to_string();
    MessageBody::Image {
        url: url.to_string(),
        caption: (!caption.is_empty()).then_some(caption),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(
            parse_image_markup("Just words"),
            MessageBody::Text("Just words".to_string())
        );
    }

    #[test]
    fn test_image_with_caption() {
        let content = "Here you go!\n[image]https://img.example/cat.png[/image]";
        assert_eq!(
            parse_image_markup(content),
            MessageBody::Image {
                url: "https://img.example/cat.png".to_string(),
                caption: Some("Here you go!".to_string()),
            }
        );
    }

    #[test]
    fn test_image_only() {
        assert_eq!(
            parse_image_markup("[image]https://img.example/a.png[/image]"),
            MessageBody::Image {
                url: "https://img.example/a.png".to_string(),
                caption: None,
            }
        );
    }

    #[test]
    fn test_empty_or_unclosed_markup_stays_text() {
        let content = "[image][/image] nothing";
        assert_eq!(parse_image_markup(content), MessageBody::Text(content.to_string()));

        let content = "[image]https://img.example/a.png";
        assert_eq!(parse_image_markup(content), MessageBody::Text(content.to_string()));
    }
}
