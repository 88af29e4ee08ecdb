use std::path::PathBuf;
use std::time::Duration;

use crate::settle::Settle;

pub const SERVICE_NAME: &str = "supernovia-scraper";

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub port: u16,
    /// Chrome/Chromium binary. `None` lets chromiumoxide locate one.
    pub chrome_executable: Option<PathBuf>,
    pub headless: bool,
    /// Captures a screenshot when a login procedure fails.
    pub debug: bool,
    pub viewport: (u32, u32),
    pub user_agent: String,
    pub navigation_timeout: Duration,
    pub settle: Settle,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            chrome_executable: None,
            headless: true,
            debug: false,
            viewport: (1920, 1080),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout: Duration::from_secs(60),
            settle: Settle::Fixed(Duration::from_secs(3)),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `PORT`, `CHROME_PATH`/`CHROMIUM_PATH`, `HEADLESS`, `SCRAPER_DEBUG`,
    /// `NAVIGATION_TIMEOUT_SECS` and `SETTLE_MS`. Unset or unparsable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let port = parsed("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let chrome_executable = parsed("CHROME_PATH")
            .or_else(|| parsed("CHROMIUM_PATH"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let headless = parsed("HEADLESS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.headless);
        let debug = parsed("SCRAPER_DEBUG")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.debug);
        let navigation_timeout = parsed("NAVIGATION_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.navigation_timeout);
        let settle = parsed("SETTLE_MS")
            .and_then(|v| v.parse().ok())
            .map(|ms| Settle::Fixed(Duration::from_millis(ms)))
            .unwrap_or(defaults.settle.clone());

        Self {
            port,
            chrome_executable,
            headless,
            debug,
            navigation_timeout,
            settle,
            ..defaults
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle(mut self, settle: Settle) -> Self {
        self.settle = settle;
        self
    }
}
