use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ScraperError;
use crate::settle::{settle, Settle};
use crate::traits::{ClickOptions, PageHandle};

/// Navigation inside a login procedure (default page-load budget).
pub const LOGIN_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// One scripted interaction of a login procedure.
#[derive(Clone, PartialEq, Eq)]
pub enum LoginStep {
    Navigate(&'static str),
    Fill {
        selector: &'static str,
        value: String,
    },
    Click {
        selector: &'static str,
        options: ClickOptions,
    },
    WaitFixed(Duration),
    WaitForSelector {
        selector: &'static str,
        timeout: Duration,
    },
}

impl LoginStep {
    pub fn navigate(url: &'static str) -> Self {
        LoginStep::Navigate(url)
    }

    pub fn fill(selector: &'static str, value: &str) -> Self {
        LoginStep::Fill {
            selector,
            value: value.to_string(),
        }
    }

    pub fn click(selector: &'static str) -> Self {
        LoginStep::Click {
            selector,
            options: ClickOptions::default(),
        }
    }

    pub fn force_click(selector: &'static str) -> Self {
        LoginStep::Click {
            selector,
            options: ClickOptions::forced(),
        }
    }

    pub fn wait_ms(ms: u64) -> Self {
        LoginStep::WaitFixed(Duration::from_millis(ms))
    }

    pub fn wait_for(selector: &'static str, timeout_ms: u64) -> Self {
        LoginStep::WaitForSelector {
            selector,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    async fn execute(&self, page: &dyn PageHandle) -> Result<(), ScraperError> {
        match self {
            LoginStep::Navigate(url) => page.goto(url, LOGIN_NAVIGATION_TIMEOUT).await,
            LoginStep::Fill { selector, value } => page.fill(selector, value).await,
            LoginStep::Click { selector, options } => page.click(selector, *options).await,
            LoginStep::WaitFixed(duration) => settle(page, &Settle::Fixed(*duration)).await,
            LoginStep::WaitForSelector { selector, timeout } => {
                settle(page, &Settle::selector(*selector, *timeout)).await
            }
        }
    }
}

// Fill values are credentials: never print them.
impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginStep::Navigate(url) => write!(f, "navigate {}", url),
            LoginStep::Fill { selector, .. } => write!(f, "fill {}", selector),
            LoginStep::Click { selector, options } if options.force => {
                write!(f, "click {} (forced)", selector)
            }
            LoginStep::Click { selector, .. } => write!(f, "click {}", selector),
            LoginStep::WaitFixed(d) => write!(f, "wait {}ms", d.as_millis()),
            LoginStep::WaitForSelector { selector, timeout } => {
                write!(f, "wait for {} ({}ms)", selector, timeout.as_millis())
            }
        }
    }
}

impl fmt::Debug for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Runs `steps` strictly in order. The first failing step aborts the procedure
/// with [`ScraperError::Login`].
pub async fn run_procedure(
    site: &str,
    page: &dyn PageHandle,
    steps: &[LoginStep],
) -> Result<(), ScraperError> {
    info!("[{}] Logging in...", site);

    for (i, step) in steps.iter().enumerate() {
        debug!("[{}] step {}/{}: {}", site, i + 1, steps.len(), step);
        step.execute(page).await.map_err(|e| {
            ScraperError::Login(format!("{}: step {} ({}) failed: {}", site, i + 1, step, e))
        })?;
    }

    info!("[{}] Login complete", site);
    Ok(())
}
