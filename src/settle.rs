//! Readiness waits for third-party pages.
//!
//! The target sites render client-side on their own schedule, so every
//! "wait until the page has caught up" point goes through [`settle`]. A fixed
//! delay always consumes its full duration; a selector wait polls until the
//! element appears and fails once its own timeout is exceeded.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::PageHandle;

const SELECTOR_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settle {
    Fixed(Duration),
    Selector {
        selector: String,
        timeout: Duration,
    },
}

impl Settle {
    pub fn selector(selector: impl Into<String>, timeout: Duration) -> Self {
        Settle::Selector {
            selector: selector.into(),
            timeout,
        }
    }
}

pub async fn settle(page: &dyn PageHandle, strategy: &Settle) -> Result<(), ScraperError> {
    match strategy {
        Settle::Fixed(duration) => {
            debug!("Settling for {:?}", duration);
            sleep(*duration).await;
            Ok(())
        }
        Settle::Selector { selector, timeout } => {
            wait_for_selector(page, selector, *timeout).await
        }
    }
}

async fn wait_for_selector(
    page: &dyn PageHandle,
    selector: &str,
    timeout: Duration,
) -> Result<(), ScraperError> {
    let start = Instant::now();
    loop {
        match page.has_element(selector).await {
            Ok(true) => {
                debug!("{} appeared after {:?}", selector, start.elapsed());
                return Ok(());
            }
            Ok(false) => {}
            // Reads fail while a navigation swaps the document; keep polling.
            Err(e) => debug!("Selector probe error for {}: {}", selector, e),
        }

        if start.elapsed() >= timeout {
            return Err(ScraperError::Timeout(format!(
                "{} did not appear within {}ms",
                selector,
                timeout.as_millis()
            )));
        }

        sleep(Duration::from_millis(SELECTOR_POLL_INTERVAL_MS)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPage;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_consumes_full_duration() {
        let page = ScriptedPage::new();
        let start = Instant::now();

        settle(&page, &Settle::Fixed(Duration::from_secs(3)))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selector_returns_once_present() {
        let page = ScriptedPage::new().appearing_after("#password", Duration::from_secs(2));
        let start = Instant::now();

        settle(&page, &Settle::selector("#password", Duration::from_secs(10)))
            .await
            .unwrap();

        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(2));
        assert!(waited < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selector_times_out() {
        let page = ScriptedPage::new().without("#password");

        let err = settle(&page, &Settle::selector("#password", Duration::from_secs(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, ScraperError::Timeout(_)));
        assert!(err.to_string().contains("#password"));
    }
}
