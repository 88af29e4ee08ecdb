//! Site adapters: one login procedure and one selector list per supported
//! database, looked up from a static table. Unknown or absent identifiers fall
//! back to [`Generic`].

mod dalloz;
mod doctrine;
mod lamyline;
mod lexisnexis;
mod linkedin;
mod steps;

use std::fmt;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::traits::PageHandle;
use crate::types::Credentials;

pub use dalloz::Dalloz;
pub use doctrine::Doctrine;
pub use lamyline::Lamyline;
pub use lexisnexis::LexisNexis;
pub use linkedin::Linkedin;
pub use steps::{run_procedure, LoginStep, LOGIN_NAVIGATION_TIMEOUT};

/// Used when no site-specific adapter applies.
pub const GENERIC_SELECTORS: &[&str] = &["article", "main", "#content", "body"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteIdentifier {
    LexisNexis,
    Dalloz,
    Doctrine,
    Lamyline,
    Linkedin,
}

impl SiteIdentifier {
    pub const ALL: [SiteIdentifier; 5] = [
        SiteIdentifier::LexisNexis,
        SiteIdentifier::Dalloz,
        SiteIdentifier::Doctrine,
        SiteIdentifier::Lamyline,
        SiteIdentifier::Linkedin,
    ];

    /// Case-insensitive; `None` for anything unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|site| site.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteIdentifier::LexisNexis => "lexisnexis",
            SiteIdentifier::Dalloz => "dalloz",
            SiteIdentifier::Doctrine => "doctrine",
            SiteIdentifier::Lamyline => "lamyline",
            SiteIdentifier::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for SiteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Log prefix.
    fn name(&self) -> &'static str;

    /// Content selectors in priority order.
    fn selectors(&self) -> &'static [&'static str];

    /// The fixed login script for these credentials.
    fn procedure(&self, credentials: &Credentials) -> Vec<LoginStep>;

    async fn login(
        &self,
        page: &dyn PageHandle,
        credentials: &Credentials,
    ) -> Result<(), ScraperError> {
        run_procedure(self.name(), page, &self.procedure(credentials)).await
    }
}

/// No login, generic selectors.
pub struct Generic;

#[async_trait]
impl SiteAdapter for Generic {
    fn name(&self) -> &'static str {
        "Generic"
    }

    fn selectors(&self) -> &'static [&'static str] {
        GENERIC_SELECTORS
    }

    fn procedure(&self, _credentials: &Credentials) -> Vec<LoginStep> {
        Vec::new()
    }

    async fn login(
        &self,
        _page: &dyn PageHandle,
        _credentials: &Credentials,
    ) -> Result<(), ScraperError> {
        Ok(())
    }
}

static ADAPTERS: &[(SiteIdentifier, &dyn SiteAdapter)] = &[
    (SiteIdentifier::LexisNexis, &LexisNexis),
    (SiteIdentifier::Dalloz, &Dalloz),
    (SiteIdentifier::Doctrine, &Doctrine),
    (SiteIdentifier::Lamyline, &Lamyline),
    (SiteIdentifier::Linkedin, &Linkedin),
];

static GENERIC: Generic = Generic;

pub fn adapter_for(site: Option<SiteIdentifier>) -> &'static dyn SiteAdapter {
    site.and_then(|site| {
        ADAPTERS
            .iter()
            .find(|(id, _)| *id == site)
            .map(|(_, adapter)| *adapter)
    })
    .unwrap_or(&GENERIC)
}
