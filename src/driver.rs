//! One scrape, start to finish: launch → login → navigate → settle → extract → close.

use std::time::Duration;

use base64::Engine;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::extract::extract;
use crate::settle::{settle, Settle};
use crate::sites::{adapter_for, SiteAdapter};
use crate::traits::{PageHandle, SessionLauncher};
use crate::types::{ExtractionResult, ScrapeRequest};

pub struct SessionDriver<L> {
    launcher: L,
    navigation_timeout: Duration,
    settle: Settle,
    debug: bool,
}

impl<L: SessionLauncher> SessionDriver<L> {
    pub fn new(launcher: L, config: &ScraperConfig) -> Self {
        Self {
            launcher,
            navigation_timeout: config.navigation_timeout,
            settle: config.settle.clone(),
            debug: config.debug,
        }
    }

    /// Every session this acquires is closed exactly once, whatever the outcome.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ExtractionResult, ScraperError> {
        info!("[Scraper] Request for {}: {}", request.site_label(), request.url);

        let session = self.launcher.launch().await?;
        let outcome = self.run(session.page(), request).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        let content = outcome?;
        info!(
            "[Scraper] Extracted {} chars from {}",
            content.chars().count(),
            request.url
        );
        Ok(ExtractionResult::new(content))
    }

    async fn run(&self, page: &dyn PageHandle, request: &ScrapeRequest) -> Result<String, ScraperError> {
        let adapter = adapter_for(request.site);

        if let Some((_, credentials)) = request.login_target() {
            if let Err(e) = adapter.login(page, credentials).await {
                if self.debug {
                    self.log_screenshot(page, adapter).await;
                }
                return Err(e);
            }
        }

        debug!("Navigating to {}", request.url);
        page.goto(&request.url, self.navigation_timeout)
            .await
            .map_err(|e| match e {
                ScraperError::Navigation(_) => e,
                other => ScraperError::Navigation(other.to_string()),
            })?;

        settle(page, &self.settle).await?;

        Ok(extract(page, adapter.selectors()).await)
    }

    async fn log_screenshot(&self, page: &dyn PageHandle, adapter: &dyn SiteAdapter) {
        match page.screenshot().await {
            Ok(png) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
                debug!(
                    "[{}] Login failure screenshot: data:image/png;base64,{}",
                    adapter.name(),
                    encoded
                );
            }
            Err(e) => debug!("[{}] Screenshot failed: {}", adapter.name(), e),
        }
    }
}
