use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ScraperError;

/// How a click is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// Dispatch the click from script, skipping visibility and hit-testing.
    pub force: bool,
}

impl ClickOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Texts read from the page in one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextSnapshot {
    /// `textContent` of each selector's first match, in selector order.
    /// `None` where nothing matched.
    pub candidates: Vec<Option<String>>,
    pub body: String,
}

/// The operations login procedures and the extractor need from a live page.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate and wait for DOM-ready, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError>;

    async fn current_url(&self) -> Result<String, ScraperError>;

    /// Replace the value of the first element matching `selector`.
    async fn fill(&self, selector: &str, value: &str) -> Result<(), ScraperError>;

    async fn click(&self, selector: &str, options: ClickOptions) -> Result<(), ScraperError>;

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError>;

    /// Every selector's first-match `textContent` plus the body text, read
    /// atomically so the document cannot change between reads.
    async fn text_snapshot(&self, selectors: &[&str]) -> Result<TextSnapshot, ScraperError>;

    /// Full-page PNG.
    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError>;
}

/// One browser instance, its isolated context and its single page.
#[async_trait]
pub trait BrowserSession: Send {
    fn page(&self) -> &dyn PageHandle;

    /// Tear the session down. Consumes the session so it cannot be reused.
    async fn close(self: Box<Self>) -> Result<(), ScraperError>;
}

#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError>;
}
