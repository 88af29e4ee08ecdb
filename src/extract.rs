//! Content extraction from an already rendered page.

use tracing::{debug, warn};

use crate::traits::{PageHandle, TextSnapshot};

/// Element text must be strictly longer than this (after trimming) to be chosen.
/// Measured in UTF-16 code units, like a DOM string's `length`.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Returns the trimmed text of the first selector whose first match carries more
/// than [`MIN_CONTENT_CHARS`] characters, otherwise the trimmed body text.
///
/// All texts come from a single snapshot of the page. Never fails: an
/// unreadable page yields an empty string.
pub async fn extract(page: &dyn PageHandle, selectors: &[&str]) -> String {
    match page.text_snapshot(selectors).await {
        Ok(snapshot) => choose_content(selectors, &snapshot),
        Err(e) => {
            warn!("Reading page text failed, returning empty content: {}", e);
            String::new()
        }
    }
}

/// Selection over an already taken snapshot.
pub fn choose_content(selectors: &[&str], snapshot: &TextSnapshot) -> String {
    for (selector, text) in selectors.iter().zip(&snapshot.candidates) {
        let Some(text) = text else {
            debug!("No element for {}", selector);
            continue;
        };

        let trimmed = dom_trim(text);
        let length = trimmed.encode_utf16().count();
        if length > MIN_CONTENT_CHARS {
            debug!("Content taken from {} ({} chars)", selector, length);
            return trimmed.to_string();
        }
        debug!("{} too short ({} chars)", selector, length);
    }

    dom_trim(&snapshot.body).to_string()
}

/// Strips what `String.prototype.trim` strips: Unicode white space and line
/// terminators plus U+FEFF, but not U+0085.
fn dom_trim(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPage;

    fn text_of(len: usize, c: char) -> String {
        std::iter::repeat(c).take(len).collect()
    }

    #[tokio::test]
    async fn test_first_qualifying_selector_wins() {
        let article = text_of(101, 'a');
        let page = ScriptedPage::new()
            .with_text("article", &format!("  \n{}\t ", article))
            .with_text("main", &text_of(500, 'm'))
            .with_body("body text");

        let content = extract(&page, &["article", "main"]).await;
        assert_eq!(content, article);
    }

    #[tokio::test]
    async fn test_exactly_threshold_is_skipped() {
        let page = ScriptedPage::new()
            .with_text("article", &text_of(100, 'a'))
            .with_text("main", &text_of(150, 'm'));

        let content = extract(&page, &["article", "main"]).await;
        assert_eq!(content, text_of(150, 'm'));
    }

    #[tokio::test]
    async fn test_threshold_counts_trimmed_chars() {
        // 95 visible chars padded with whitespace must not qualify.
        let padded = format!("{}{}", text_of(95, 'x'), text_of(20, ' '));
        let page = ScriptedPage::new()
            .with_text("article", &padded)
            .with_body("  fallback  ");

        assert_eq!(extract(&page, &["article"]).await, "fallback");
    }

    #[tokio::test]
    async fn test_multibyte_text_counts_characters() {
        let accented = text_of(101, 'é');
        let page = ScriptedPage::new().with_text("#content", &accented);

        assert_eq!(extract(&page, &["#content"]).await, accented);
    }

    #[tokio::test]
    async fn test_astral_text_counts_utf16_units() {
        // 60 emoji are 120 UTF-16 units.
        let emoji = text_of(60, '😀');
        let page = ScriptedPage::new()
            .with_text("article", &emoji)
            .with_body("fallback");

        assert_eq!(extract(&page, &["article"]).await, emoji);
    }

    #[tokio::test]
    async fn test_byte_order_mark_is_trimmed() {
        // 98 letters wrapped in BOMs stay under the threshold once trimmed.
        let wrapped = format!("\u{feff}{}\u{feff}\u{feff}", text_of(98, 'x'));
        let page = ScriptedPage::new()
            .with_text("article", &wrapped)
            .with_body("\u{feff} fallback \u{feff}");

        assert_eq!(extract(&page, &["article"]).await, "fallback");
    }

    #[test]
    fn test_next_line_is_not_trimmed() {
        assert_eq!(dom_trim("\u{85}x\u{a0}\u{2028}"), "\u{85}x");
    }

    #[tokio::test]
    async fn test_falls_back_to_body() {
        let page = ScriptedPage::new()
            .with_text("article", "short")
            .with_body("\n  whole page  \n");

        assert_eq!(extract(&page, &["article", "main"]).await, "whole page");
    }

    #[tokio::test]
    async fn test_page_is_read_once() {
        let page = ScriptedPage::new()
            .with_text("#content", &text_of(10, 'c'))
            .with_body("body");

        extract(&page, &["article", "main", "#content", "body"]).await;
        assert_eq!(page.snapshot_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_yields_empty_string() {
        let page = ScriptedPage::new();
        assert_eq!(extract(&page, &["article"]).await, "");
    }

    #[tokio::test]
    async fn test_read_errors_degrade_to_empty() {
        let page = ScriptedPage::new()
            .with_text("article", &text_of(300, 'a'))
            .failing_reads();

        assert_eq!(extract(&page, &["article"]).await, "");
    }
}
