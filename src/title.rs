//! Display titles derived from the first message of a conversation.

/// Title shown when nothing better is known.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Appended when a title had to be cut mid-sentence.
pub const ELLIPSIS: char = '…';

/// Titles up to this many characters are kept whole.
const MAX_UNTRUNCATED: usize = 50;

/// Characters inspected when looking for a break point.
const WINDOW: usize = 47;

/// A break point must sit past this offset to be used.
const MIN_BREAK: usize = 20;

/// Turn a raw message into a bounded-length title.
///
/// Lengths are counted in characters. Messages longer than 50 characters
/// are cut at the last sentence end (kept, no ellipsis) or the last
/// whitespace (ellipsis appended) within the first 47 characters, provided
/// the break sits past offset 20; otherwise the first 47 characters are
/// kept with an ellipsis. Blank input yields [`DEFAULT_TITLE`].
pub fn derive_title(raw: Option<&str>) -> String {
    let cleaned = raw.map(str::trim).unwrap_or_default();
    if cleaned.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let chars: Vec<char> = cleaned.chars().collect();
    if chars.len() <= MAX_UNTRUNCATED {
        return cleaned.to_string();
    }

    let window = &chars[..WINDOW];
    let last_sentence_end = window.iter().rposition(|c| matches!(c, '.' | '?' | '!'));
    let last_space = window.iter().rposition(|c| c.is_whitespace());

    match (last_sentence_end, last_space) {
        (Some(end), _) if end > MIN_BREAK => window[..=end].iter().collect(),
        (_, Some(space)) if space > MIN_BREAK => with_ellipsis(&window[..space]),
        _ => with_ellipsis(window),
    }
}

fn with_ellipsis(chars: &[char]) -> String {
    let mut title: String = chars.iter().collect();
    title.push(ELLIPSIS);
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_default() {
        assert_eq!(derive_title(None), DEFAULT_TITLE);
        assert_eq!(derive_title(Some("")), DEFAULT_TITLE);
        assert_eq!(derive_title(Some("   \n\t")), DEFAULT_TITLE);
    }

    #[test]
    fn test_short_input_trimmed_and_kept() {
        assert_eq!(derive_title(Some("  What is a bond?  ")), "What is a bond?");
        let fifty = "a".repeat(50);
        assert_eq!(derive_title(Some(&fifty)), fifty);
    }

    #[test]
    fn test_breaks_at_sentence_end_without_ellipsis() {
        let raw = "Explain compound interest to me. I want examples with real numbers please";
        assert_eq!(derive_title(Some(raw)), "Explain compound interest to me.");
    }

    #[test]
    fn test_breaks_at_last_space_with_ellipsis() {
        let raw = "Tell me everything there is to know about the history of jazz music in New Orleans";
        let title = derive_title(Some(raw));
        assert_eq!(title, "Tell me everything there is to know about the…");
        assert!(title.chars().count() <= 48);
    }

    #[test]
    fn test_early_sentence_end_is_ignored() {
        // The '?' sits at offset 4, under the minimum, so the space rule applies.
        let raw = "Why? Because the quarterly revenue projections for the new product line look odd";
        let title = derive_title(Some(raw));
        assert!(title.ends_with(ELLIPSIS));
        assert!(!title.starts_with("Why?…"));
        assert!(title.chars().count() <= 48);
    }

    #[test]
    fn test_hard_truncation_without_breaks() {
        let raw = "x".repeat(80);
        let title = derive_title(Some(&raw));
        assert_eq!(title.chars().count(), 48);
        assert!(title.starts_with(&"x".repeat(47)));
        assert!(title.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let raw = "é".repeat(50);
        assert_eq!(derive_title(Some(&raw)), raw);

        let raw = "日本語".repeat(30);
        let title = derive_title(Some(&raw));
        assert_eq!(title.chars().count(), 48);
    }

    #[test]
    fn test_long_results_bounded() {
        let samples = [
            "a b c d e f g h i j k l m n o p q r s t u v w x y z a b c d e f g h",
            "This sentence has no terminal punctuation but goes on for quite a while",
            "Short. Then a very long tail without any more punctuation in the window at all",
            "Nearly there! But the sentence continues on and on past the fifty mark",
        ];
        for raw in samples {
            let title = derive_title(Some(raw));
            assert!(title.chars().count() <= 48, "{:?} -> {:?}", raw, title);
            assert!(!title.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let raw = "How do I structure a small business partnership agreement fairly?";
        assert_eq!(derive_title(Some(raw)), derive_title(Some(raw)));
    }
}
