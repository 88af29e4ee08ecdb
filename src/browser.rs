//! chromiumoxide implementation of the session and page abstractions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::sites::LOGIN_NAVIGATION_TIMEOUT;
use crate::traits::{BrowserSession, ClickOptions, PageHandle, SessionLauncher, TextSnapshot};

/// Set on the outgoing document so the incoming one can be told apart.
const NAV_MARKER: &str = "__supernoviaLeaving";
const DOM_READY_POLL_MS: u64 = 100;

/// Launches one fresh Chromium per session.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    config: ScraperConfig,
}

impl ChromiumLauncher {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// CDP commands must outlive the longest navigation bound, otherwise the
    /// handler evicts `Page.navigate` before `goto` gives up.
    fn request_timeout(&self) -> Duration {
        self.config.navigation_timeout.max(LOGIN_NAVIGATION_TIMEOUT)
    }

    fn browser_config(&self, user_data_dir: &Path) -> Result<BrowserConfig, ScraperError> {
        let (width, height) = self.config.viewport;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(user_data_dir)
            .request_timeout(self.request_timeout())
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Default::default()
            });

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("browser config: {}", e)))
    }

    async fn open_page(&self, browser: &mut Browser) -> Result<Page, ScraperError> {
        let context_id = browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("browser context: {}", e)))?;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id)
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("target params: {}", e)))?;

        let page = browser
            .new_page(target)
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("new page: {}", e)))?;

        page.execute(SetUserAgentOverrideParams::new(self.config.user_agent.clone()))
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("user agent: {}", e)))?;

        Ok(page)
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError> {
        debug!("Launching browser...");

        let mut profile = ProfileDir::new();
        let config = self.browser_config(profile.path())?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        match self.open_page(&mut browser).await {
            Ok(page) => {
                debug!("Browser session ready");
                Ok(Box::new(ChromiumSession {
                    browser,
                    handler,
                    page: ChromiumPage { page },
                    profile,
                }))
            }
            Err(e) => {
                if let Err(close) = shutdown(&mut browser, &handler).await {
                    warn!("{}", close);
                }
                profile.remove().await;
                Err(e)
            }
        }
    }
}

/// Closes the browser and stops its handler. A browser that refuses the close
/// command is killed, so the process is gone either way.
async fn shutdown(browser: &mut Browser, handler: &JoinHandle<()>) -> Result<(), ScraperError> {
    let closed = match browser.close().await {
        Ok(_) => Ok(()),
        Err(e) => {
            if let Some(Err(kill)) = browser.kill().await {
                debug!("Killing browser failed: {}", kill);
            }
            Err(ScraperError::BrowserInit(format!("close: {}", e)))
        }
    };
    if let Err(e) = browser.wait().await {
        debug!("Waiting for browser exit failed: {}", e);
    }
    handler.abort();
    closed
}

/// Per-launch Chromium profile under the temp dir, so concurrent browsers never
/// share a lock file. Removed on [`ProfileDir::remove`] or, failing that, on drop.
struct ProfileDir {
    path: PathBuf,
    removed: bool,
}

impl ProfileDir {
    fn new() -> Self {
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        Self::at(std::env::temp_dir().join(format!("supernovia-{}", unique_id)))
    }

    fn at(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn remove(&mut self) {
        self.removed = true;
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            debug!("Could not remove {:?}: {}", self.path, e);
        }
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed abandoned profile {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove abandoned profile {:?}: {}", self.path, e),
        }
    }
}

// Field order matters: `browser` drops (and kills the process) before `profile`
// deletes its directory.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: ChromiumPage,
    profile: ProfileDir,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    fn page(&self) -> &dyn PageHandle {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<(), ScraperError> {
        let mut session = *self;
        let closed = shutdown(&mut session.browser, &session.handler).await;
        session.profile.remove().await;

        if closed.is_ok() {
            info!("Browser closed");
        }
        closed
    }
}

// Reached without `close` when the request future is dropped mid-scrape.
impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

pub struct ChromiumPage {
    page: Page,
}

/// JSON string literal, safe to splice into a script.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

impl ChromiumPage {
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, ScraperError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }

    async fn navigate(&self, url: &str) -> Result<(), ScraperError> {
        if let Err(e) = self.page.evaluate(format!("window.{} = true", NAV_MARKER)).await {
            debug!("Could not mark outgoing document: {}", e);
        }

        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(ScraperError::Navigation)?;
        let response = self
            .page
            .execute(params)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;

        if let Some(error) = &response.result.error_text {
            return Err(ScraperError::Navigation(format!("{}: {}", url, error)));
        }
        // Fragment navigation keeps the document.
        if response.result.loader_id.is_none() {
            return Ok(());
        }

        let probe = format!(
            "window.{} !== true && document.readyState !== 'loading'",
            NAV_MARKER
        );
        loop {
            // Errors here mean the old execution context is being torn down.
            if let Ok(true) = self.eval::<bool>(probe.clone()).await {
                return Ok(());
            }
            sleep(Duration::from_millis(DOM_READY_POLL_MS)).await;
        }
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        tokio::time::timeout(timeout, self.navigate(url))
            .await
            .map_err(|_| {
                ScraperError::Navigation(format!(
                    "{} not ready within {}s",
                    url,
                    timeout.as_secs()
                ))
            })?
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?
            .unwrap_or_default())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), ScraperError> {
        // Goes through the prototype setter so framework-controlled inputs see the change.
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.focus();
                const desc = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value');
                if (desc && desc.set) {{ desc.set.call(el, {value}); }} else {{ el.value = {value}; }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            selector = js_string(selector),
            value = js_string(value),
        );

        if self.eval::<bool>(script).await? {
            Ok(())
        } else {
            Err(ScraperError::ElementNotFound(selector.to_string()))
        }
    }

    async fn click(&self, selector: &str, options: ClickOptions) -> Result<(), ScraperError> {
        if options.force {
            let script = format!(
                "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
                js_string(selector)
            );
            return if self.eval::<bool>(script).await? {
                Ok(())
            } else {
                Err(ScraperError::ElementNotFound(selector.to_string()))
            };
        }

        self.page
            .find_element(selector)
            .await
            .map_err(|e| ScraperError::ElementNotFound(format!("{}: {}", selector, e)))?
            .click()
            .await
            .map_err(|e| ScraperError::JavaScript(format!("click {}: {}", selector, e)))?;
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError> {
        self.eval(format!("document.querySelector({}) !== null", js_string(selector)))
            .await
    }

    async fn text_snapshot(&self, selectors: &[&str]) -> Result<TextSnapshot, ScraperError> {
        let selectors = serde_json::to_string(selectors)
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        let script = format!(
            r#"(() => ({{
                candidates: {selectors}.map((selector) => {{
                    const el = document.querySelector(selector);
                    return el ? (el.textContent || '') : null;
                }}),
                body: document.body ? (document.body.textContent || '') : '',
            }}))()"#,
            selectors = selectors,
        );
        self.eval(script).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScraperError> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }
}
