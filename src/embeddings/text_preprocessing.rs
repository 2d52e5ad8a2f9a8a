//! Text preprocessing utilities for embedding generation
//!
//! Cleans and bounds text before it is sent to an embedding provider.

use tracing::debug;
use tracing::warn;

use crate::errors::RecommenderError;

/// Longest text (in bytes) sent to the embedding provider
pub const MAX_EMBEDDING_TEXT_LEN: usize = 1500;

/// Preprocess text for embedding generation
///
/// Collapses whitespace and newlines, drops control characters and truncates long
/// input at a sentence or word boundary.
pub fn preprocess_text_for_embedding(text: &str) -> Result<String, RecommenderError> {
    if text.is_empty() {
        return Err(RecommenderError::EmbeddingError(
            "Empty text provided".to_string(),
        ));
    }

    let sanitized = clean_text(text);

    if sanitized.is_empty() {
        return Err(RecommenderError::EmbeddingError(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    if sanitized.len() > MAX_EMBEDDING_TEXT_LEN {
        warn!(
            "Text too long ({} chars), truncating for embedding",
            sanitized.len()
        );
        return Ok(truncate_text(&sanitized, MAX_EMBEDDING_TEXT_LEN));
    }

    debug!(
        "Preprocessed text: {} -> {} chars",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Control characters become spaces, then whitespace runs collapse to one space
fn clean_text(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Largest char boundary at or below `max_len`
fn floor_char_boundary(text: &str, max_len: usize) -> usize {
    if max_len >= text.len() {
        return text.len();
    }
    (0..=max_len)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Truncate at the last sentence end, else the last word boundary, within `max_len`
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let truncated = &text[..floor_char_boundary(text, max_len)];

    if let Some(end) = truncated.rfind(['.', '!', '?']) {
        if end > max_len * 2 / 3 {
            return truncated[..=end].to_string();
        }
    }

    if let Some(last_space) = truncated.rfind(' ') {
        if last_space > max_len * 3 / 4 {
            return truncated[..last_space].to_string();
        }
    }

    truncated.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("hello\nworld"), "hello world");
        assert_eq!(clean_text("hello\r\n\tworld"), "hello world");
        assert_eq!(clean_text("hello\x00world"), "hello world");
        assert_eq!(clean_text("Price:   ₹1299"), "Price: ₹1299");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "→".repeat(1000);
        let result = truncate_text(&text, 10);
        assert!(result.len() <= 10);
        assert!(result.chars().all(|c| c == '→'));
    }

    #[test]
    fn test_truncate_prefers_sentence_end() {
        let text = format!("{}. tail words here", "a".repeat(90));
        let result = truncate_text(&text, 100);
        assert!(result.ends_with('.'));
    }

    #[test]
    fn test_preprocess_text_for_embedding() {
        assert_eq!(
            preprocess_text_for_embedding("Title: Python\nLevel: beginner").unwrap(),
            "Title: Python Level: beginner"
        );
        assert!(preprocess_text_for_embedding("").is_err());
        assert!(preprocess_text_for_embedding("   \n\t   ").is_err());

        let long = "word ".repeat(1000);
        assert!(preprocess_text_for_embedding(&long).unwrap().len() <= MAX_EMBEDDING_TEXT_LEN);
    }
}
