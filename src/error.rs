use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    /// Rejected before any browser work.
    #[error("{0}")]
    Validation(String),

    #[error("browser init error: {0}")]
    BrowserInit(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("login error: {0}")]
    Login(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("javascript error: {0}")]
    JavaScript(String),
}

impl ScraperError {
    /// Stable machine-readable kind, surfaced next to the message in HTTP errors.
    pub fn code(&self) -> &'static str {
        match self {
            ScraperError::Validation(_) => "validation",
            ScraperError::BrowserInit(_) => "browser_init",
            ScraperError::Navigation(_) => "navigation",
            ScraperError::Login(_) => "login",
            ScraperError::Timeout(_) => "timeout",
            ScraperError::ElementNotFound(_) => "element_not_found",
            ScraperError::JavaScript(_) => "javascript",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ScraperError::Validation(_))
    }
}
