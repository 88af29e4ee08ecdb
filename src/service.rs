use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;

use crate::browser::ChromiumLauncher;
use crate::config::ScraperConfig;
use crate::driver::SessionDriver;
use crate::error::ScraperError;
use crate::traits::SessionLauncher;
use crate::types::{ExtractionResult, ScrapeRequest};

/// tower::Service over [`SessionDriver`]. Clones share the driver; every call
/// still launches its own browser.
pub struct ScraperService<L = ChromiumLauncher> {
    driver: Arc<SessionDriver<L>>,
}

impl ScraperService<ChromiumLauncher> {
    pub fn new(config: &ScraperConfig) -> Self {
        Self::with_launcher(ChromiumLauncher::new(config.clone()), config)
    }
}

impl<L: SessionLauncher> ScraperService<L> {
    pub fn with_launcher(launcher: L, config: &ScraperConfig) -> Self {
        Self {
            driver: Arc::new(SessionDriver::new(launcher, config)),
        }
    }
}

impl<L> Clone for ScraperService<L> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
        }
    }
}

impl<L: SessionLauncher + 'static> Service<ScrapeRequest> for ScraperService<L> {
    type Response = ExtractionResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        let driver = self.driver.clone();
        Box::pin(async move { driver.scrape(&req).await })
    }
}
