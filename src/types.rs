//! Request and result types.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::ScraperError;
use crate::sites::SiteIdentifier;

pub const MISSING_URL_MESSAGE: &str = "URL requise";

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A validated scrape job.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub site: Option<SiteIdentifier>,
    pub credentials: Option<Credentials>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Result<Self, ScraperError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ScraperError::Validation(MISSING_URL_MESSAGE.to_string()));
        }
        Ok(Self {
            url: url.trim().to_string(),
            site: None,
            credentials: None,
        })
    }

    pub fn with_site(mut self, site: SiteIdentifier) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Credentials are only usable together with a recognized site.
    pub fn login_target(&self) -> Option<(SiteIdentifier, &Credentials)> {
        match (self.site, self.credentials.as_ref()) {
            (Some(site), Some(credentials)) => Some((site, credentials)),
            _ => None,
        }
    }

    pub fn site_label(&self) -> &'static str {
        self.site.map(|s| s.as_str()).unwrap_or("generic")
    }
}

/// `POST /scrape` body as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapePayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub database: Option<String>,
}

impl TryFrom<ScrapePayload> for ScrapeRequest {
    type Error = ScraperError;

    fn try_from(payload: ScrapePayload) -> Result<Self, Self::Error> {
        let mut request = ScrapeRequest::new(payload.url.unwrap_or_default())?;

        if let Some(database) = payload.database.as_deref() {
            request.site = SiteIdentifier::from_name(database);
            if request.site.is_none() {
                debug!("Unknown database {:?}, using generic extraction", database);
            }
        }
        request.credentials = payload.credentials;

        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub content: String,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    pub fn new(content: String) -> Self {
        Self {
            content,
            extracted_at: Utc::now(),
        }
    }

    /// ISO-8601 with millisecond precision and a `Z` suffix.
    pub fn extracted_at_iso(&self) -> String {
        self.extracted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
